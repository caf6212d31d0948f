//! レポートのレイアウト定数
//!
//! PDFはA4縦・mm単位。座標は左下原点。

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 18.0;

/// ヘッダー帯の高さ
pub const HEADER_BAND_MM: f32 = 28.0;

pub const TITLE_FONT_PT: f32 = 18.0;
pub const HEADING_FONT_PT: f32 = 14.0;
pub const BODY_FONT_PT: f32 = 11.0;
pub const NOTE_FONT_PT: f32 = 9.0;

/// 本文1行の送り
pub const LINE_STEP_MM: f32 = 6.4;
/// 見出しの前後の余白
pub const SECTION_GAP_MM: f32 = 7.0;
/// 注記1行の送り
pub const NOTE_STEP_MM: f32 = 4.2;

/// 箇条書きのインデント
pub const BULLET_INDENT_MM: f32 = 4.0;

/// 色（RGB 0.0〜1.0）
pub type Rgb = (f32, f32, f32);

pub const HEADER_COLOR: Rgb = (0.059, 0.090, 0.165);
pub const WHITE: Rgb = (1.0, 1.0, 1.0);
pub const BLACK: Rgb = (0.0, 0.0, 0.0);
pub const GREY: Rgb = (0.5, 0.5, 0.5);
pub const RISK_HIGH_COLOR: Rgb = (0.86, 0.15, 0.15);
pub const RISK_LOW_COLOR: Rgb = (0.06, 0.60, 0.32);

/// 本文の開始位置（1ページ目はヘッダー帯の下から）
pub fn content_top_mm(first_page: bool) -> f32 {
    if first_page {
        A4_HEIGHT_MM - HEADER_BAND_MM - MARGIN_MM
    } else {
        A4_HEIGHT_MM - MARGIN_MM
    }
}

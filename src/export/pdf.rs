//! PDF生成（printpdf）
//!
//! 内容は `vigilance_common::export::pdf_core` で組み立て、ここでは描画のみ行う。

use crate::error::{Result, VigilanceError};
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use vigilance_common::export::pdf_core::{build_report, ReportLine, ReportModel};
use vigilance_common::layout::{self, *};
use vigilance_common::{ForensicRecord, Signal};

fn color(rgb: layout::Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(rgb.0, rgb.1, rgb.2, None))
}

/// 書き込み位置を管理し、下端に達したら改ページする
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: content_top_mm(true),
        }
    }

    fn ensure_room(&mut self, step: f32) {
        if self.y - step < MARGIN_MM {
            let (page, layer) = self.doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = content_top_mm(false);
        }
    }

    fn text(&mut self, text: &str, size: f32, x: f32, step: f32, font: &IndirectFontRef, fill: layout::Rgb) {
        self.ensure_room(step);
        self.layer.set_fill_color(color(fill));
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= step;
    }

    fn separator(&mut self) {
        self.ensure_room(SECTION_GAP_MM);
        let y = self.y + LINE_STEP_MM / 2.0;
        self.layer.set_outline_color(color(GREY));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                (Point::new(Mm(A4_WIDTH_MM - MARGIN_MM), Mm(y)), false),
            ],
            is_closed: false,
        });
        self.y -= SECTION_GAP_MM;
    }
}

pub fn generate_pdf(record: &ForensicRecord, output_path: &Path, title: &str) -> Result<()> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let model = build_report(record, title, &generated_at);
    render(&model, output_path)
}

/// レポートモデルを描画して保存
pub fn render(model: &ReportModel, output_path: &Path) -> Result<()> {
    let (doc, page1, layer1) = PdfDocument::new(&model.title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| VigilanceError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| VigilanceError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;

    let first_layer = doc.get_page(page1).get_layer(layer1);

    // ヘッダー帯
    first_layer.set_fill_color(color(HEADER_COLOR));
    first_layer.add_rect(Rect::new(
        Mm(0.0),
        Mm(A4_HEIGHT_MM - HEADER_BAND_MM),
        Mm(A4_WIDTH_MM),
        Mm(A4_HEIGHT_MM),
    ));
    first_layer.set_fill_color(color(WHITE));
    first_layer.use_text(
        &model.title,
        TITLE_FONT_PT,
        Mm(MARGIN_MM),
        Mm(A4_HEIGHT_MM - HEADER_BAND_MM / 2.0 - 2.5),
        &bold,
    );

    let mut cursor = PageCursor::new(&doc, first_layer);

    cursor.text(&model.entity_line, HEADING_FONT_PT, MARGIN_MM, LINE_STEP_MM + 1.0, &bold, BLACK);
    let verdict_color = match model.signal {
        Signal::High => RISK_HIGH_COLOR,
        Signal::Low => RISK_LOW_COLOR,
    };
    cursor.text(&model.verdict_line, HEADING_FONT_PT, MARGIN_MM, LINE_STEP_MM, &bold, verdict_color);
    cursor.separator();

    for line in &model.body {
        match line {
            ReportLine::Heading(text) => {
                cursor.text(text, HEADING_FONT_PT, MARGIN_MM, SECTION_GAP_MM, &bold, HEADER_COLOR);
            }
            ReportLine::Bullet(text) => {
                let bullet = format!("- {}", text);
                cursor.text(&bullet, BODY_FONT_PT, MARGIN_MM + BULLET_INDENT_MM, LINE_STEP_MM, &regular, BLACK);
            }
            ReportLine::Text(text) => {
                cursor.text(text, BODY_FONT_PT, MARGIN_MM + BULLET_INDENT_MM, LINE_STEP_MM, &regular, BLACK);
            }
            ReportLine::Spacer => {
                cursor.y -= LINE_STEP_MM / 2.0;
            }
        }
    }

    cursor.separator();
    for note in &model.notes {
        cursor.text(note, NOTE_FONT_PT, MARGIN_MM, NOTE_STEP_MM, &regular, GREY);
    }

    // 保存
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| VigilanceError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))?;

    Ok(())
}

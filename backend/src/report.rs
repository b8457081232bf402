use chrono::Utc;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use shared::PredictionResponse;

pub const REPORT_FILENAME: &str = "AgroDetect_Report.pdf";
pub const NO_PREDICTION_PLACEHOLDER: &str =
    "No prediction yet. Upload a leaf photo to generate a diagnosis.";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to render report: {0}")]
    Render(String),
}

/// Render the given prediction snapshot as a one-page PDF. An empty snapshot
/// produces a report with an explicit placeholder instead of failing.
pub fn render(result: Option<&PredictionResponse>) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        "AgroDetect AI Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "report",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;

    let layer = doc.get_page(page).get_layer(layer);
    layer.use_text("AgroDetect AI Report", 20.0, Mm(20.0), Mm(270.0), &bold);

    match result {
        Some(prediction) => {
            layer.use_text(
                format!("Disease: {}", prediction.disease),
                12.0,
                Mm(20.0),
                Mm(250.0),
                &regular,
            );
            layer.use_text(
                format!("Confidence: {}%", prediction.confidence),
                12.0,
                Mm(20.0),
                Mm(242.0),
                &regular,
            );
            layer.use_text(
                format!("Remedy: {}", prediction.remedy),
                12.0,
                Mm(20.0),
                Mm(234.0),
                &regular,
            );
        }
        None => {
            layer.use_text(
                NO_PREDICTION_PLACEHOLDER,
                12.0,
                Mm(20.0),
                Mm(250.0),
                &regular,
            );
        }
    }

    layer.use_text(
        format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        9.0,
        Mm(20.0),
        Mm(20.0),
        &regular,
    );

    doc.save_to_bytes().map_err(render_error)
}

fn render_error<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

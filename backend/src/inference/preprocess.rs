use image::imageops::FilterType;
use ndarray::Array4;

use super::PredictError;

/// Input edge length expected by the classifier.
pub const INPUT_SIZE: u32 = 224;

/// Turn uploaded image bytes into the tensor the classifier consumes:
/// decode, coerce to RGB, resize to exactly 224x224, scale channels to
/// [0, 1] and prepend a batch dimension of 1.
///
/// Pure function of the input bytes. Undecodable bytes fail with
/// `PredictError::Decode`.
pub fn preprocess(bytes: &[u8]) -> Result<Array4<f32>, PredictError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let size = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, y as usize, x as usize, channel]] = pixel[channel] as f32 / 255.0;
        }
    }

    Ok(tensor)
}

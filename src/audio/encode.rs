use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Wrap mono f32 samples in a 16-bit PCM WAV container at the given rate.
pub fn wav_payload(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer =
        WavWriter::new(&mut cursor, spec).context("failed to initialize WAV writer")?;
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .context("failed to write WAV sample")?;
    }
    writer.finalize().context("failed to finalize WAV payload")?;

    Ok(cursor.into_inner())
}

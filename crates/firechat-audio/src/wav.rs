use std::path::Path;

use crate::error::AudioError;

/// Sample rate the streaming endpoint expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Chunk cadence in milliseconds.
pub const CHUNK_MS: u64 = 50;

const SAMPLES_PER_CHUNK: usize = (TARGET_SAMPLE_RATE as usize * CHUNK_MS as usize) / 1000;

/// Decode a WAV file into normalized mono f32 samples plus its sample rate.
pub fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32), AudioError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let mut samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample.max(1) as u32;
            let max_val = if bits > 1 {
                ((1i64 << (bits - 1)) - 1) as f32
            } else {
                1.0
            };
            reader
                .samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| (s as f32 / max_val).clamp(-1.0, 1.0))
                .collect()
        }
        hound::SampleFormat::Float => reader.samples::<f32>().filter_map(|s| s.ok()).collect(),
    };

    if channels > 1 {
        let mut mono = Vec::with_capacity(samples.len() / channels + 1);
        for frame in samples.chunks(channels) {
            let sum: f32 = frame.iter().copied().sum();
            mono.push(sum / frame.len() as f32);
        }
        samples = mono;
    }

    if samples.is_empty() {
        return Err(AudioError::EmptyAudio);
    }

    Ok((samples, spec.sample_rate))
}

/// Linear resampling; good enough for speech fed to a transcription model.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).round().max(1.0) as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let left = pos.floor() as usize;
        let frac = (pos - left as f64) as f32;
        let a = samples[left.min(samples.len() - 1)];
        let b = samples[(left + 1).min(samples.len() - 1)];
        out.push(a + (b - a) * frac);
    }
    out
}

/// Convert normalized samples into 50 ms little-endian PCM16 chunks ready to
/// send as binary frames. The last chunk may be shorter.
pub fn pcm16_chunks(samples: &[f32]) -> Vec<Vec<u8>> {
    samples
        .chunks(SAMPLES_PER_CHUNK)
        .map(|chunk| {
            let mut bytes = Vec::with_capacity(chunk.len() * 2);
            for sample in chunk {
                let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            bytes
        })
        .collect()
}

/// Decode, mix down, resample and chunk a WAV file for streaming.
pub fn prepare_chunks(path: &Path) -> Result<Vec<Vec<u8>>, AudioError> {
    let (samples, sample_rate) = decode_wav(path)?;
    let resampled = resample_linear(&samples, sample_rate, TARGET_SAMPLE_RATE);
    Ok(pcm16_chunks(&resampled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for sample in frames {
            writer.write_sample(*sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_mixes_stereo_to_mono() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        // two frames: (max, min) averages to ~0, (half, half) stays half
        write_wav(
            &path,
            2,
            16_000,
            &[i16::MAX, i16::MIN, i16::MAX / 2, i16::MAX / 2],
        );

        let (samples, rate) = decode_wav(&path).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(samples.len(), 2);
        assert!(samples[0].abs() < 0.001);
        assert!((samples[1] - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_decode_empty_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 1, 16_000, &[]);
        assert!(matches!(decode_wav(&path), Err(AudioError::EmptyAudio)));
    }

    #[test]
    fn test_resample_halves_length() {
        let samples: Vec<f32> = (0..3200).map(|i| (i % 100) as f32 / 100.0).collect();
        let out = resample_linear(&samples, 32_000, 16_000);
        let expected = samples.len() / 2;
        assert!(out.len().abs_diff(expected) <= 1);
    }

    #[test]
    fn test_resample_noop_at_target_rate() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&samples, 16_000, 16_000), samples);
    }

    #[test]
    fn test_chunks_are_50ms_of_pcm16() {
        // 16000 Hz * 0.05 s = 800 samples = 1600 bytes per chunk
        let samples = vec![0.0f32; 2000];
        let chunks = pcm16_chunks(&samples);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1600);
        assert_eq!(chunks[1].len(), 1600);
        assert_eq!(chunks[2].len(), 800);
    }

    #[test]
    fn test_pcm16_encoding_is_little_endian() {
        let chunks = pcm16_chunks(&[1.0, -1.0]);
        let bytes = &chunks[0];
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), i16::MAX);
        // -1.0 * 32767 truncates to -32767
        assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), -i16::MAX);
    }

    #[test]
    fn test_prepare_chunks_resamples_to_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hi.wav");
        // 0.1 s at 32 kHz becomes 0.1 s at 16 kHz: 1600 samples, two chunks
        write_wav(&path, 1, 32_000, &vec![100i16; 3200]);
        let chunks = prepare_chunks(&path).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 1600);
    }
}

use std::io::{BufWriter, Write};

const BINS: usize = 128;
const MARKER: &str = "start";

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// One frame of ambient floor plus an optional peak, clamped to the sensor range.
fn generate_frame(
    floor: &[f64],
    peak: Option<(f64, f64, f64)>,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<u32> {
    floor
        .iter()
        .enumerate()
        .map(|(bin, &ambient)| {
            let signal = peak
                .map(|(mu, sigma, amp)| gaussian(bin as f64, mu, sigma, amp))
                .unwrap_or(0.0);
            (ambient + signal + rng.gauss(0.0, noise_level)).clamp(0.0, 255.0) as u32
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_frame(out: &mut impl Write, values: &[u32]) -> std::io::Result<()> {
    write!(out, "{MARKER}")?;
    for v in values {
        write!(out, ",{v}")?;
    }
    writeln!(out)
}

fn main() -> anyhow::Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_capture.txt".to_string());
    let mut rng = SimpleRng::new(42);

    // Ambient floor rising gently towards the high bins.
    let floor: Vec<f64> = (0..BINS).map(|i| 20.0 + i as f64 * 0.15).collect();

    // (frames, peak centre, width, amplitude)
    let script: [(usize, Option<(f64, f64, f64)>); 6] = [
        (400, None),
        (120, Some((8.0, 1.5, 180.0))),
        (60, None),
        (120, Some((15.0, 1.2, 200.0))),
        (80, Some((60.0, 3.0, 220.0))),
        (200, None),
    ];

    let file = std::fs::File::create(&output_path)?;
    let mut out = BufWriter::new(file);
    let mut frames = 0usize;

    for &(count, peak) in &script {
        for _ in 0..count {
            let values = generate_frame(&floor, peak, 3.0, &mut rng);
            frames += 1;

            // Roughly one damaged line in fifty, like a serial link dropping bytes.
            match rng.next_u64() % 50 {
                0 => {
                    let cut = values.len() / 2;
                    write_frame(&mut out, &values[..cut])?;
                }
                1 => {
                    let line: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                    writeln!(out, "{}", line.join(","))?;
                }
                _ => write_frame(&mut out, &values)?,
            }
        }
    }
    out.flush()?;

    println!("Wrote {frames} frames ({BINS} bins each) to {output_path}");
    Ok(())
}

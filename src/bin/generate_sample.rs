//! Write a deterministic sample portfolio to `data/home.csv`.
//!
//! Regenerating with the same seed reproduces the file byte-for-byte, so the
//! committed sample can always be rebuilt.

use anyhow::{Context, Result};

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

    /// Uniform integer in `[lo, hi]`.
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as u32
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(7);

    std::fs::create_dir_all("data").context("creating data directory")?;
    let output_path = "data/home.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record([
        "inception_date",
        "written_premium",
        "claim_incurred",
        "sum_insured",
    ])?;

    let mut rows: u32 = 0;
    for year in 2017..=2021 {
        // Per-year volume drifts a little so the summary tiles move between
        // year selections.
        let policies = 220 + rng.range_u32(0, 60);

        for _ in 0..policies {
            let month = rng.range_u32(1, 12);
            let day = rng.range_u32(1, 28);

            let sum_insured =
                (250_000.0 * rng.gauss(0.0, 0.45).exp()).clamp(60_000.0, 2_500_000.0);
            let written_premium = sum_insured * 0.0035 * rng.gauss(1.0, 0.12).max(0.4);

            // Roughly one policy in eight incurs a claim; a small share of
            // those are recoveries on earlier settlements.
            let claim_incurred = if rng.next_f64() < 0.125 {
                let severity = written_premium * rng.gauss(1.2, 0.8).exp();
                if rng.next_f64() < 0.06 {
                    -severity * 0.3
                } else {
                    severity
                }
            } else {
                0.0
            };

            writer.write_record(&[
                format!("{year}-{month:02}-{day:02}"),
                format!("{written_premium:.2}"),
                format!("{claim_incurred:.2}"),
                format!("{sum_insured:.2}"),
            ])?;
            rows += 1;
        }
    }

    writer.flush()?;
    println!("Wrote {rows} policies to {output_path}");
    Ok(())
}

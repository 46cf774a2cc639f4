use std::fs;
use std::path::Path;

/// Job codes and titles for the companion codebook. Codes follow the
/// three-digit occupation coding of the survey.
const JOBS: &[(i64, &str)] = &[
    (111, "Legislators and senior government officials"),
    (120, "Corporate managers"),
    (212, "Natural science researchers"),
    (235, "Medical doctors"),
    (247, "Secondary school teachers"),
    (259, "Legal professionals"),
    (312, "General office clerks"),
    (330, "Accounting clerks"),
    (411, "Cooks"),
    (422, "Travel attendants"),
    (510, "Retail sales workers"),
    (611, "Crop growers"),
    (630, "Fishery workers"),
    (721, "Metal workers"),
    (741, "Electricians"),
    (855, "Assembly line workers"),
    (910, "Cleaners"),
    (941, "Food preparation helpers"),
];

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

    /// Uniform pick from 0..n
    fn pick(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 1200;

    fs::create_dir_all("data").expect("Failed to create data directory");

    // ---- Survey rows, raw column names and sentinel codes included ----
    let data_path = Path::new("data/welfare_2015.csv");
    let mut writer = csv::Writer::from_path(data_path).expect("Failed to create data file");
    writer
        .write_record([
            "h10_g3",    // sex: 1 male, 2 female
            "h10_g4",    // birth year, 9999 = no answer
            "h10_g10",   // marital status
            "h10_g11",   // religion
            "h10_eco9",  // job code, 9999 = no answer
            "p1002_8aq1", // monthly income, 9999 / 0 = missing
            "h10_reg7",  // region code 1..7
        ])
        .expect("Failed to write header");

    for _ in 0..n_rows {
        let sex = if rng.next_f64() < 0.01 {
            9
        } else {
            1 + rng.pick(2) as i64
        };

        let birth_year = if rng.next_f64() < 0.01 {
            9999
        } else {
            (rng.gauss(1963.0, 18.0).round() as i64).clamp(1920, 1998)
        };

        let marital = 1 + rng.pick(5) as i64;
        let religion = 1 + rng.pick(2) as i64;

        // Roughly a third of respondents have no recorded occupation.
        let job_idx = if rng.next_f64() < 0.35 {
            None
        } else {
            Some(rng.pick(JOBS.len()))
        };
        let job_code = match job_idx {
            _ if rng.next_f64() < 0.02 => "9999".to_string(),
            Some(idx) => JOBS[idx].0.to_string(),
            None => String::new(),
        };

        // Income tracks the job code so the per-job means spread out.
        let income = match job_idx {
            _ if rng.next_f64() < 0.03 => "9999".to_string(),
            _ if rng.next_f64() < 0.02 => "0".to_string(),
            Some(idx) => {
                let base = 140.0 + 12.0 * idx as f64;
                format!("{:.1}", rng.gauss(base, 45.0).max(25.0))
            }
            None => String::new(),
        };

        let region = 1 + rng.pick(7) as i64;

        writer
            .write_record([
                sex.to_string(),
                birth_year.to_string(),
                marital.to_string(),
                religion.to_string(),
                job_code,
                income,
                region.to_string(),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush data file");

    // ---- Companion codebook: job code → job title ----
    let codebook_path = Path::new("data/welfare_2015_codebook.csv");
    let mut codebook =
        csv::Writer::from_path(codebook_path).expect("Failed to create codebook file");
    codebook
        .write_record(["job_code", "직종"])
        .expect("Failed to write codebook header");
    for (code, name) in JOBS {
        codebook
            .write_record([code.to_string(), (*name).to_string()])
            .expect("Failed to write codebook row");
    }
    codebook.flush().expect("Failed to flush codebook file");

    println!(
        "Wrote {n_rows} rows to {} and {} job titles to {}",
        data_path.display(),
        JOBS.len(),
        codebook_path.display()
    );
}

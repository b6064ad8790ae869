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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.range(0, options.len() as i64 - 1) as usize]
    }

    /// A comma-joined non-empty subset, in option order.
    fn multi_pick(&mut self, options: &[&str]) -> String {
        loop {
            let chosen: Vec<&str> = options
                .iter()
                .copied()
                .filter(|_| self.next_f64() < 0.4)
                .collect();
            if !chosen.is_empty() {
                return chosen.join(", ");
            }
        }
    }
}

const OPENING_HOURS: &[&str] = &["8-12 hours", "12-16 hours", "16-24 hours"];
const PEAK_HOURS: &[&str] = &["Breakfast", "Lunch", "Evening", "Dinner"];
const DAY_INFLUENCE: &[&str] = &[
    "Fridays=Spike in sales",
    "Weekends=Higher footfall",
    "Weekdays=Steady trade",
    "Mondays=Slow start",
];
const OCCASIONS: &[&str] = &["Eid", "Ramadan", "Weddings", "Public holidays"];
const MENU_ITEMS: &[&str] = &["Biryani", "Kebab", "Haleem", "Nihari", "Samosa", "Tea"];
const PREP_BASIS: &[&str] = &[
    "Daily estimate",
    "Past sales",
    "Fixed amount",
    "Chef's judgement",
];
const SALES_TRACKING: &[&str] = &["POS system", "Manual register", "Notebook", "None"];
const STORAGE: &[&str] = &["Refrigeration", "Freezing", "Dry storage", "Same-day use"];
const LEFTOVERS: &[&str] = &["Donated", "Discarded", "Staff meals", "Reused next day"];
const WASTE_MEASURE: &[&str] = &["Visual estimate", "Weighed daily", "Bin counts", "Not measured"];

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_survey.csv".to_string());

    let mut rng = SimpleRng::new(42);
    let rows = 120;

    let mut writer =
        csv::Writer::from_path(&output_path).with_context(|| format!("creating {output_path}"))?;

    // Raw, un-normalized headers on purpose: the loader's normalization
    // pass is part of what this sample exercises.
    writer.write_record([
        "Opening Hours",
        "Staff per Shift",
        "Peak Hours",
        "Day Influence",
        "Occasion Impact",
        "Popular Menu Items",
        "Prep Quantity Basis",
        "Sales Tracking",
        "Daily Customers",
        "Servings per Item",
        "Pre-Consumer Waste %",
        "Storage Methods",
        "Leftover Handling",
        "Post-Consumer Waste Measure",
    ])?;

    for i in 0..rows {
        let staff = rng.range(2, 12);
        // customer volume loosely tracks staffing, so the correlation
        // heatmap has something to show
        let customers = staff * 25 + rng.range(-30, 60);
        let servings = rng.range(10, 60);
        let waste_pct = (rng.next_f64() * 12.0 + 1.0 + staff as f64 * 0.2 * rng.next_f64())
            .min(15.0);

        // sprinkle a few blank answers to exercise missing-value handling
        let waste_field = if i % 17 == 0 {
            String::new()
        } else {
            format!("{waste_pct:.1}")
        };
        let prep_field = if i % 23 == 0 {
            String::new()
        } else {
            rng.pick(PREP_BASIS).to_string()
        };

        writer.write_record([
            rng.pick(OPENING_HOURS).to_string(),
            staff.to_string(),
            rng.multi_pick(PEAK_HOURS),
            rng.pick(DAY_INFLUENCE).to_string(),
            rng.multi_pick(OCCASIONS),
            rng.multi_pick(MENU_ITEMS),
            prep_field,
            rng.pick(SALES_TRACKING).to_string(),
            customers.to_string(),
            servings.to_string(),
            waste_field,
            rng.pick(STORAGE).to_string(),
            rng.pick(LEFTOVERS).to_string(),
            rng.pick(WASTE_MEASURE).to_string(),
        ])?;
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {rows} survey responses to {output_path}");
    Ok(())
}

use chrono::{Duration, NaiveDate};

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

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64) as usize % bound
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// 32-hex-char pseudo id, the shape of the real export's hashes.
    fn hex_id(&mut self) -> String {
        format!("{:016x}{:016x}", self.next_u64(), self.next_u64())
    }
}

/// Pick an index from cumulative weights.
fn weighted_pick(rng: &mut SimpleRng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.next_f64() * total;
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let states = ["SP", "RJ", "MG", "RS", "PR", "SC", "BA", "DF", "ES", "GO"];
    let state_weights = [42.0, 13.0, 12.0, 5.5, 5.0, 3.6, 3.4, 2.1, 2.0, 2.0];

    let categories = [
        ("bed_bath_table", 2.2, 90.0),
        ("health_beauty", 2.0, 120.0),
        ("sports_leisure", 1.8, 110.0),
        ("furniture_decor", 1.7, 85.0),
        ("computers_accessories", 1.5, 115.0),
        ("housewares", 1.4, 90.0),
        ("watches_gifts", 1.2, 200.0),
        ("telephony", 1.0, 70.0),
        ("garden_tools", 0.9, 110.0),
        ("auto", 0.8, 140.0),
        ("toys", 0.7, 115.0),
        ("cool_stuff", 0.6, 165.0),
        ("perfumery", 0.5, 105.0),
        ("baby", 0.4, 105.0),
        ("electronics", 0.3, 60.0),
    ];
    let category_weights: Vec<f64> = categories.iter().map(|c| c.1).collect();

    // Customer pool; a minority of customers order repeatedly, which gives
    // the RFM section something to rank.
    let n_customers = 600;
    let customers: Vec<(String, usize)> = (0..n_customers)
        .map(|_| {
            let id = rng.hex_id();
            let state = weighted_pick(&mut rng, &state_weights);
            (id, state)
        })
        .collect();

    let first_day = NaiveDate::from_ymd_opt(2017, 1, 1).expect("valid date");
    let n_days = 607; // through 2018-08-30

    let mut writer = match csv::Writer::from_path("main_data.csv") {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Failed to create main_data.csv: {e}");
            std::process::exit(1);
        }
    };
    writer
        .write_record([
            "order_id",
            "customer_unique_id",
            "customer_state",
            "order_purchase_date",
            "product_category_name",
            "price",
        ])
        .expect("writing header");

    let n_orders = 2000;
    let mut n_lines = 0usize;

    for _ in 0..n_orders {
        let order_id = rng.hex_id();
        let (customer_id, state_idx) = {
            let (id, s) = &customers[rng.next_usize(customers.len())];
            (id.clone(), *s)
        };
        // Mild growth over time: later days slightly more likely.
        let day = ((rng.next_f64().powf(0.8)) * n_days as f64) as i64;
        let date = first_day + Duration::days(day);

        let lines = 1 + rng.next_usize(3);
        for _ in 0..lines {
            let cat_idx = weighted_pick(&mut rng, &category_weights);
            let (name, _, mean_price) = categories[cat_idx];
            let price = rng.gauss(mean_price, mean_price * 0.4).max(5.0);

            writer
                .write_record([
                    order_id.as_str(),
                    customer_id.as_str(),
                    states[state_idx],
                    &date.format("%Y-%m-%d").to_string(),
                    name,
                    &format!("{price:.2}"),
                ])
                .expect("writing order line");
            n_lines += 1;
        }
    }

    writer.flush().expect("flushing CSV");
    println!("Wrote {n_lines} order lines across {n_orders} orders to main_data.csv");
}

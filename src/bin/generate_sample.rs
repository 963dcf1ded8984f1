use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use wanderlist::data::schema::{restaurant, travel};

/// (country, region, city, continent, base temperature)
const PLACES: &[(&str, &str, &str, &str, i32)] = &[
    ("Indonesië", "Bali", "Ubud", "Azië", 29),
    ("Noorwegen", "Oslo", "Oslo", "Europa", 4),
    ("Italië", "Toscane", "Florence", "Europa", 19),
    ("Italië", "Lazio", "Rome", "Europa", 21),
    ("Spanje", "Andalusië", "Sevilla", "Europa", 24),
    ("Japan", "Kansai", "Kyoto", "Azië", 16),
    ("Peru", "Cusco", "Cusco", "Zuid-Amerika", 12),
    ("Marokko", "Marrakech-Safi", "Marrakech", "Afrika", 26),
];

const PURPOSES: &[&str] = &["Cultuur", "Strand", "Natuur", "Citytrip", "Avontuur"];
const ACCOMMODATIONS: &[&str] = &["Hotel", "Hostel", "Appartement", "Camping"];
const SEASONS: &[&str] = &["Lente", "Zomer", "Herfst", "Winter"];
const TRANSPORT: &[&str] = &["Vliegtuig", "Trein", "Auto", "Bus", "Boot"];
const CUISINES: &[&str] = &["Lokaal", "Italiaans", "Japans", "Vegetarisch", "Vis"];
const MEALS: &[&str] = &["ontbijt", "lunch", "diner"];

/// Small deterministic PRNG (splitmix64) so samples are reproducible.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn between(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// One to `max` distinct items joined with `;`.
    fn pick_several(&mut self, items: &[&str], max: usize) -> String {
        let count = 1 + self.below(max.min(items.len()));
        let start = self.below(items.len());
        (0..count)
            .map(|i| items[(start + i) % items.len()])
            .collect::<Vec<_>>()
            .join(";")
    }
}

fn write_travel(path: &Path, rng: &mut SampleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(travel::HEADER)?;

    let mut rows = 0;
    for &(country, region, city, continent, base_temp) in PLACES {
        for variant in 0..3 {
            let min = rng.between(1, 7);
            let max = min + rng.between(0, 14);
            let budget = rng.between(3, 40) * 50;
            let temperature = i64::from(base_temp) + rng.between(-4, 4);
            // every fifth row carries an unusable budget, as real sheets do
            let budget = if rows % 5 == 4 {
                "onbekend".to_string()
            } else {
                budget.to_string()
            };

            writer.write_record([
                format!("{country} / {region}"),
                country.to_string(),
                region.to_string(),
                city.to_string(),
                continent.to_string(),
                rng.pick(PURPOSES).to_string(),
                rng.pick(ACCOMMODATIONS).to_string(),
                rng.pick_several(SEASONS, 3),
                rng.pick_several(TRANSPORT, 2),
                min.to_string(),
                max.to_string(),
                budget,
                temperature.to_string(),
                format!("Voorbeeld {} in {city}", variant + 1),
                String::new(),
                String::new(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_restaurants(path: &Path, rng: &mut SampleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(restaurant::HEADER)?;

    let mut rows = 0;
    for &(country, region, city, _, _) in PLACES {
        for n in 0..4 {
            let level = rng.between(1, 4) as usize;
            let price = if n % 2 == 0 {
                "€".repeat(level)
            } else {
                level.to_string()
            };
            writer.write_record([
                format!("{city} Eethuis {}", n + 1),
                rng.pick(CUISINES).to_string(),
                country.to_string(),
                region.to_string(),
                city.to_string(),
                format!("{country} / {city}"),
                price,
                rng.pick_several(MEALS, 3),
                String::new(),
                String::new(),
                String::new(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng(42);
    let travel_path = out_dir.join("travel.csv");
    let restaurant_path = out_dir.join("restaurants.csv");

    let travel_rows = write_travel(&travel_path, &mut rng)?;
    let restaurant_rows = write_restaurants(&restaurant_path, &mut rng)?;

    info!("wrote {travel_rows} destinations to {}", travel_path.display());
    info!("wrote {restaurant_rows} restaurants to {}", restaurant_path.display());
    println!(
        "Generated {} and {}",
        travel_path.display(),
        restaurant_path.display()
    );
    Ok(())
}

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use wanderlist::data::loader::load_file;
use wanderlist::data::model::{format_number, RestaurantRecord, TravelRecord};
use wanderlist::data::options::cascade_options;
use wanderlist::data::schema::canonical_column;
use wanderlist::data::writer::{append_destination, NewDestination};
use wanderlist::error::ParseError;
use wanderlist::export::{render, ExportFormat};
use wanderlist::{
    filter_restaurants, filter_travel, Bounds, Itinerary, ItineraryDay, Meal, RestaurantCriteria,
    TravelCriteria,
};

#[derive(Parser, Debug)]
#[command(name = "wanderlist", version, about = "Filter travel destinations and restaurants, plan your days")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List destinations matching the given filters
    Destinations(DestinationArgs),
    /// List restaurants matching the given filters
    Restaurants(RestaurantArgs),
    /// Show the option list of one column
    Options(OptionsArgs),
    /// Build an itinerary and export it
    Plan(PlanArgs),
    /// Append a new destination to a travel CSV
    Add(AddArgs),
}

#[derive(Args, Debug)]
pub struct DestinationArgs {
    /// Travel table (.csv or .json)
    #[arg(long)]
    pub data: PathBuf,

    /// JSON file with saved criteria; flags below are applied on top
    #[arg(long)]
    pub criteria: Option<PathBuf>,

    /// Trip length in days, LOW..HIGH
    #[arg(long, allow_hyphen_values = true)]
    pub duration: Option<Bounds<f64>>,

    #[arg(long, allow_hyphen_values = true)]
    pub budget: Option<Bounds<f64>>,

    /// Temperature in °C, LOW..HIGH
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<Bounds<f64>>,

    #[arg(long = "continent")]
    pub continents: Vec<String>,

    #[arg(long = "purpose")]
    pub purposes: Vec<String>,

    #[arg(long = "accommodation")]
    pub accommodations: Vec<String>,

    #[arg(long = "season")]
    pub seasons: Vec<String>,

    #[arg(long = "transport")]
    pub transport_modes: Vec<String>,

    #[arg(long = "country")]
    pub countries: Vec<String>,

    #[arg(long = "region")]
    pub regions: Vec<String>,

    #[arg(long = "city")]
    pub cities: Vec<String>,

    /// Print matching records as JSON
    #[arg(long)]
    pub json: bool,
}

impl DestinationArgs {
    fn criteria(&self) -> Result<TravelCriteria> {
        let mut criteria = match &self.criteria {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading criteria {}", path.display()))?;
                serde_json::from_str(&text).context("parsing criteria")?
            }
            None => TravelCriteria::default(),
        };

        if self.duration.is_some() {
            criteria.duration = self.duration;
        }
        if self.budget.is_some() {
            criteria.budget = self.budget;
        }
        if self.temperature.is_some() {
            criteria.temperature = self.temperature;
        }
        criteria.continents.extend(self.continents.iter().cloned());
        criteria.purposes.extend(self.purposes.iter().cloned());
        criteria.accommodations.extend(self.accommodations.iter().cloned());
        criteria.seasons.extend(self.seasons.iter().cloned());
        criteria.transport_modes.extend(self.transport_modes.iter().cloned());
        criteria.countries.extend(self.countries.iter().cloned());
        criteria.regions.extend(self.regions.iter().cloned());
        criteria.cities.extend(self.cities.iter().cloned());
        Ok(criteria)
    }
}

#[derive(Args, Debug)]
pub struct RestaurantArgs {
    /// Restaurant table (.csv or .json)
    #[arg(long)]
    pub data: PathBuf,

    #[arg(long = "cuisine")]
    pub cuisines: Vec<String>,

    /// Exact location label
    #[arg(long = "location")]
    pub locations: Vec<String>,

    #[arg(long = "country")]
    pub countries: Vec<String>,

    #[arg(long = "region")]
    pub regions: Vec<String>,

    #[arg(long = "city")]
    pub cities: Vec<String>,

    /// Case-insensitive part of the city or location
    #[arg(long)]
    pub near: Option<String>,

    #[arg(long)]
    pub meal: Option<Meal>,

    /// Price level 1-4, LOW..HIGH
    #[arg(long)]
    pub price: Option<Bounds<u8>>,

    #[arg(long)]
    pub json: bool,
}

impl RestaurantArgs {
    fn criteria(&self) -> RestaurantCriteria {
        RestaurantCriteria {
            cuisines: self.cuisines.iter().cloned().collect(),
            locations: self.locations.iter().cloned().collect(),
            countries: self.countries.iter().cloned().collect(),
            regions: self.regions.iter().cloned().collect(),
            cities: self.cities.iter().cloned().collect(),
            near: self.near.clone(),
            meal: self.meal,
            price: self.price,
        }
    }
}

#[derive(Args, Debug)]
pub struct OptionsArgs {
    #[arg(long)]
    pub data: PathBuf,

    /// Column to list, e.g. "seizoen" or "regio"
    #[arg(long)]
    pub column: String,

    /// Split `;`-delimited cells
    #[arg(long)]
    pub multi: bool,

    /// Upstream choice narrowing the rows first, COLUMN=VALUE
    #[arg(long = "where", value_parser = parse_condition)]
    pub conditions: Vec<(String, String)>,
}

fn parse_condition(s: &str) -> Result<(String, String), ParseError> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| ParseError::Condition(s.to_string()))?;
    Ok((canonical_column(column), value.trim().to_string()))
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// A day as "destination|breakfast|lunch|dinner" (repeatable, in order)
    #[arg(long = "day", required = true)]
    pub days: Vec<ItineraryDay>,

    #[arg(long, default_value = "text")]
    pub format: ExportFormat,

    /// Write the document here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Travel CSV to append to (created when missing)
    #[arg(long)]
    pub data: PathBuf,

    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub country: String,

    #[arg(long, default_value = "")]
    pub region: String,

    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long, default_value = "")]
    pub continent: String,

    #[arg(long, default_value = "")]
    pub purpose: String,

    #[arg(long, default_value = "")]
    pub accommodation: String,

    #[arg(long = "season")]
    pub seasons: Vec<String>,

    #[arg(long = "transport")]
    pub transport_modes: Vec<String>,

    #[arg(long)]
    pub min_days: u32,

    #[arg(long)]
    pub max_days: u32,

    #[arg(long)]
    pub budget: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,

    #[arg(long, default_value = "")]
    pub remark: String,

    #[arg(long, default_value = "")]
    pub url: String,

    #[arg(long, default_value = "")]
    pub photo: String,
}

impl From<AddArgs> for NewDestination {
    fn from(args: AddArgs) -> Self {
        NewDestination {
            name: args.name,
            country: args.country,
            region: args.region,
            city: args.city,
            continent: args.continent,
            purpose: args.purpose,
            accommodation: args.accommodation,
            seasons: args.seasons,
            transport_modes: args.transport_modes,
            min_duration_days: args.min_days,
            max_duration_days: args.max_days,
            budget: args.budget,
            temperature: args.temperature,
            remark: args.remark,
            url: args.url,
            photo_url: args.photo,
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Destinations(args) => destinations(&args),
        Command::Restaurants(args) => restaurants(&args),
        Command::Options(args) => options(&args),
        Command::Plan(args) => plan(args),
        Command::Add(args) => {
            let path = args.data.clone();
            append_destination(&path, &args.into())
        }
    }
}

fn destinations(args: &DestinationArgs) -> Result<()> {
    let table = load_file(&args.data)?;
    let criteria = args.criteria()?;
    let records = filter_travel(&table, &criteria).travel_records();
    info!("{} of {} destinations match", records.len(), table.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No destinations found.");
    } else {
        for record in &records {
            println!("{}", destination_card(record));
        }
    }
    Ok(())
}

fn restaurants(args: &RestaurantArgs) -> Result<()> {
    let table = load_file(&args.data)?;
    let records = filter_restaurants(&table, &args.criteria()).restaurant_records();
    info!("{} of {} restaurants match", records.len(), table.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No restaurants found.");
    } else {
        for record in &records {
            println!("{}", restaurant_card(record));
        }
    }
    Ok(())
}

fn options(args: &OptionsArgs) -> Result<()> {
    let table = load_file(&args.data)?;
    let upstream: Vec<(&str, &str)> = args
        .conditions
        .iter()
        .map(|(c, v)| (c.as_str(), v.as_str()))
        .collect();
    let column = canonical_column(&args.column);
    for option in cascade_options(&table, &upstream, &column, args.multi) {
        println!("{option}");
    }
    Ok(())
}

fn plan(args: PlanArgs) -> Result<()> {
    let mut itinerary = Itinerary::new();
    for day in args.days {
        itinerary.push(day);
    }
    let bytes = render(itinerary.export(), args.format)?;

    match &args.out {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}-day itinerary to {}", itinerary.len(), path.display());
        }
        None => std::io::stdout()
            .write_all(&bytes)
            .context("writing itinerary to stdout")?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

fn titled(name: &str, url: Option<&str>, remark: &str) -> String {
    let mut line = match url {
        Some(url) => format!("- {name} ({url})"),
        None => format!("- {name}"),
    };
    if !remark.is_empty() {
        line.push_str(": ");
        line.push_str(remark);
    }
    line
}

pub fn destination_card(r: &TravelRecord) -> String {
    let mut details = vec![
        format!("€{}", format_number(r.budget)),
        format!(
            "{}-{} days",
            format_number(r.min_duration_days),
            format_number(r.max_duration_days)
        ),
    ];
    if let Some(t) = r.temperature {
        details.push(format!("{} °C", format_number(t)));
    }
    let transport = r.transport_modes();
    if !transport.is_empty() {
        details.push(transport.join(", "));
    }
    format!(
        "{}\n    {}",
        titled(&r.name, r.url.as_deref(), &r.remark),
        details.join(" | ")
    )
}

pub fn restaurant_card(r: &RestaurantRecord) -> String {
    let location = if r.location_label.is_empty() {
        &r.city
    } else {
        &r.location_label
    };
    let price = r.price_symbols();
    let details = [r.cuisine.as_str(), price.as_str(), location.as_str()]
        .into_iter()
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{}\n    {details}", titled(&r.name, r.url.as_deref(), &r.remark))
}

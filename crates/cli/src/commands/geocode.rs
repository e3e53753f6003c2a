use anyhow::Result;
use photolink_core::geocode;

use super::link::format_coordinates;

pub fn run(location: &str) -> Result<()> {
    match geocode::lookup(location) {
        Some(c) => println!("{}", format_coordinates(c.lat, c.lng)),
        None => println!("not found"),
    }
    Ok(())
}

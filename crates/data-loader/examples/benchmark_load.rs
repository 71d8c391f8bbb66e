use data_loader::{Dataset, LoadOptions};
use std::path::Path;
use std::time::Instant;

fn main() -> data_loader::Result<()> {
    let data_dir = Path::new("data/films");

    println!("Loading film dataset...\n");

    let start = Instant::now();
    let dataset = Dataset::load_from_files(data_dir, &LoadOptions::default())?;
    let elapsed = start.elapsed();

    let (films, credited, ratings) = dataset.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Films: {}", films);
    println!("Films with credits: {}", credited);
    println!("Ratings: {} ({} skipped)", ratings, dataset.skipped_ratings());
    println!(
        "\nPerformance: {:.0} ratings/second",
        ratings as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}

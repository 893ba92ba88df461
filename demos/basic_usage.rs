// ============================================================================
// Basic Usage Example
// ============================================================================

use decimal_stats::numeric::to_rust_decimal;
use decimal_stats::prelude::*;
use std::str::FromStr;

fn main() -> StatsResult<()> {
    #[cfg(feature = "logging")]
    decimal_stats::utils::init_logging();

    println!("=== Decimal Stats Example ===\n");

    // Keep the 20 most recent trade prices
    let config = BufferConfig::rolling(20).with_initial_capacity(8);
    let prices = RollingDecimalBuffer::with_config(config)?;

    println!("Recording trade prices...");
    for i in 0i64..30 {
        let price = Decimal::new((5_000_000 + (i * 37) % 250 * 100 - i * 50).into(), 2);
        if let Some(evicted) = prices.append(price) {
            println!("  evicted {}", evicted);
        }
    }
    println!(
        "\nBuffer holds {} prices (capacity {})",
        prices.len(),
        prices.capacity()
    );

    // Dispersion
    println!("\n=== Dispersion ===");
    let summary = prices.summary();
    let context = RoundingContext::new(12, RoundingMode::HalfEven);
    if let Some(mean) = summary.mean(&context)? {
        println!("Mean:               {}", mean);
    }
    if let Some(v) = variance(&prices, Estimator::Sample, &context)? {
        println!("Sample variance:    {}", v);
    }
    if let Some(sd) = std_dev(&prices, Estimator::Sample, &context)? {
        println!("Sample std dev:     {}", sd);
        println!("As rust_decimal:    {}", to_rust_decimal(&sd)?);
    }

    // Percentiles over a snapshot; the buffer keeps accepting prices
    println!("\n=== Percentiles ===");
    let mut selector = OrderStatisticSelector::from_buffer(&prices);
    for q in ["0", "0.05", "0.25", "0.5", "0.75", "0.95", "1"] {
        let p = Decimal::from_str(q).map_err(|e| StatsError::Domain(e.to_string()))?;
        if let Some(value) = selector.evaluate(&p)? {
            println!("  p{:<5} {}", q, value);
        }
    }

    // Square roots under different rounding modes
    println!("\n=== Square Root of 2 ===");
    let two = Decimal::from(2);
    for mode in [RoundingMode::Down, RoundingMode::HalfEven, RoundingMode::Up] {
        let root = sqrt(&two, &RoundingContext::new(30, mode))?;
        println!("  {:<9} {}", mode, root);
    }

    match sqrt(&two, &RoundingContext::exact()) {
        Ok(root) => println!("  EXACT     {}", root),
        Err(e) => println!("  EXACT     {}", e),
    }

    Ok(())
}

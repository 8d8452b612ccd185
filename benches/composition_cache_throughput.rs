/// Benchmark for composition cache performance
///
/// Measures repeated composition of the same base + extension set against
/// uncached composition (cache cleared before every call), then the ingest
/// config lookups that ride on the same cache.

use robograph::SchemaComposer;
use std::time::Instant;

fn main() {
    println!("=== Composition Cache Throughput Benchmark ===\n");

    let composer = SchemaComposer::with_builtin();
    let iterations = 1_000;

    println!("📊 Benchmark: compose(base, [roboledger]) - Uncached");
    let uncached_start = Instant::now();
    for _ in 0..iterations {
        composer.clear_cache();
        composer
            .compose("base", &["roboledger"])
            .expect("compose base + roboledger");
    }
    let uncached = uncached_start.elapsed();
    let uncached_ops = iterations as f64 / uncached.as_secs_f64();
    println!("  Iterations: {}", iterations);
    println!("  Time: {:?}", uncached);
    println!("  Throughput: {:.0} compositions/sec\n", uncached_ops);

    println!("📊 Benchmark: compose(base, [roboledger]) - Cached");
    composer.clear_cache();
    let cached_start = Instant::now();
    for _ in 0..iterations {
        composer
            .compose("base", &["roboledger"])
            .expect("compose base + roboledger");
    }
    let cached = cached_start.elapsed();
    let cached_ops = iterations as f64 / cached.as_secs_f64();
    println!("  Iterations: {}", iterations);
    println!("  Time: {:?}", cached);
    println!("  Throughput: {:.0} compositions/sec", cached_ops);
    println!("  Hit rate: {:.1}%\n", composer.cache_stats().hit_rate() * 100.0);

    println!("📊 Benchmark: ingest_config + file routing - Cached");
    let paths: Vec<String> = ["Entity", "Account", "LineItem", "ENTITY_HAS_ACCOUNT", "Unknown"]
        .iter()
        .map(|t| format!("/exports/{}/part-0000.parquet", t))
        .collect();
    let routing_start = Instant::now();
    let mut routed = 0usize;
    for _ in 0..iterations {
        let generator = composer
            .ingest_config("base", &["roboledger"])
            .expect("ingest config");
        routed += paths.iter().filter(|p| generator.classify(p).is_some()).count();
    }
    let routing = routing_start.elapsed();
    println!("  Lookups: {} ({} routed)", iterations * paths.len(), routed);
    println!("  Time: {:?}\n", routing);

    println!("=== Summary ===");
    println!("  Uncached: {:.0} compositions/sec", uncached_ops);
    println!("  Cached:   {:.0} compositions/sec", cached_ops);
    println!("  Speedup:  {:.1}x", cached_ops / uncached_ops);
}

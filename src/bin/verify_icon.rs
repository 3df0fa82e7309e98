use placeholder_icon::verify;

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "assets/icon.png".to_string());

    let bytes = std::fs::read(&path).expect("Failed to read icon");
    let report = verify::inspect(&bytes).expect("Failed to decode icon");

    println!("Checking icon: {}", path);
    println!("Image dimensions: {}x{}", report.width, report.height);
    println!("Color type: {:?}", report.color_type);

    let [r, g, b] = report.sample.0;
    println!("\nTop-left pixel:");
    println!("  RGB: [{}, {}, {}]", r, g, b);

    let total = u64::from(report.width) * u64::from(report.height);
    println!("\nUniformity:");
    println!("  {} out of {} pixels differ from the top-left pixel", report.mismatched, total);

    if report.is_uniform() {
        println!("✓ Uniform icon");
    } else {
        println!("⚠ Icon is not a single color");
        std::process::exit(1);
    }
}

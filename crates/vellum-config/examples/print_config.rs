/// Example program to print the loaded configuration
///
/// Run with: cargo run -p vellum-config --example print_config

fn main() {
    let config = vellum_config::VellumConfig::load();

    println!("=== Vellum Configuration ===\n");

    println!("Animation Settings:");
    println!("  Movement: {} ms", config.animation.movement_ms);
    println!("  Presence: {} ms", config.animation.presence_ms);
    println!("  Frame Interval: {} ms", config.animation.frame_interval_ms);
    println!("  Idle Multiple: {}", config.animation.idle_multiple);
    println!("  Removal Threshold: {}", config.animation.removal_threshold);
    println!();

    println!("Rendering Settings:");
    println!("  Scale Factor: {:?}", config.rendering.scale_factor);
    println!("  Background: {:?}", config.rendering.background);
    println!("  Char Width Factor: {}", config.rendering.char_width_factor);
    println!();

    println!("Text Settings:");
    println!("  Font: {:?}", config.text.font);
    println!("  Size: {}", config.text.size);
    println!("  Wrap Length: {}", config.text.wrap_length);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}

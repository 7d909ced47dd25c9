//! Pretty terminal output at startup.
//! Used by: main.

use colored::Colorize;

pub fn print_banner() {
    println!();
    println!("{}", "╔═══════════════════════════════════════════════════╗".cyan());
    println!("║     {}      ║", "📈 gcprobe v0.1.0".bold().white());
    println!("║     {}     ║", "Runtime memory & GC stats over HTTP".dimmed());
    println!("{}", "╚═══════════════════════════════════════════════════╝".cyan());
    println!();
}

pub fn print_startup(addr: &str) {
    println!("{} {}", "✓".green().bold(), "Server ready".white().bold());
    println!("  {} {}", "→".dimmed(), format!("http://{}", addr).cyan().underline());
    println!();
    println!("{}", "Endpoints:".white().bold());
    println!("  {} {}   {}", "GET".green(), "/stats".white(), "Memory & GC snapshot".dimmed());
    println!("  {} {}  {}", "GET".green(), "/health".white(), "Health check".dimmed());
    println!();
}

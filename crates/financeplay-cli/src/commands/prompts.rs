//! Prompt library command implementations

use anyhow::Result;
use financeplay_core::prompts::{PromptId, PromptInfo, PromptLibrary};

/// List all prompts and their override status
pub fn cmd_prompts_list(library: &mut PromptLibrary) -> Result<Vec<PromptInfo>> {
    let prompts = library.list();

    println!("Available Prompts:\n");
    println!("{:<20} {:>7}  {}", "ID", "VERSION", "OVERRIDE");
    println!("{}", "-".repeat(50));

    for info in &prompts {
        let status = match &info.override_path {
            Some(path) => format!("✓ Custom ({})", path.display()),
            None => "Default".to_string(),
        };
        println!("{:<20} {:>7}  {}", info.id, info.version, status);
    }

    println!();
    print_override_dir(library);
    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory");
    println!("  2. Edit the file, keeping the YAML frontmatter");
    println!("  3. Restart the server to use the new prompt");

    Ok(prompts)
}

/// Print one prompt with its source
pub fn cmd_prompts_show(library: &mut PromptLibrary, prompt_id: &str) -> Result<()> {
    let id: PromptId = prompt_id.parse().map_err(|e: String| {
        let known: Vec<_> = PromptId::all().iter().map(|id| id.as_str()).collect();
        anyhow::anyhow!("{} (available: {})", e, known.join(", "))
    })?;
    let prompt = library.get(id)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    println!(
        "Source: {}",
        if prompt.is_override { "Override" } else { "Default" }
    );
    if let Some(ref path) = prompt.override_path {
        println!("Override Path: {}", path.display());
    }

    println!();
    println!("--- Content ---");
    println!("{}", prompt.content);

    Ok(())
}

/// Show where prompt overrides are read from
pub fn cmd_prompts_path(library: &PromptLibrary) -> Result<()> {
    print_override_dir(library);
    Ok(())
}

fn print_override_dir(library: &PromptLibrary) {
    match library.override_dir() {
        Some(path) => {
            println!("Override directory: {}", path.display());
            if !path.exists() {
                println!("Note: This directory does not exist yet. Create it to add custom prompts.");
            }
        }
        None => println!("Override directory: (not available on this system)"),
    }
}

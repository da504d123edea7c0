use mdexport_core::config::{ConfigLoader, default_config_path};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            println!("OK   mdexp doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("vault_root: {}", rc.vault_root.display());
            println!(
                "output_dir: {}",
                rc.output_dir
                    .as_ref()
                    .map_or_else(|| "(current directory)".to_string(), |p| p.display().to_string())
            );
            println!("excluded_frontmatter_keys: {}", list(&rc.exclusions.frontmatter_keys));
            println!("excluded_headers: {}", list(&rc.exclusions.headers));
            println!("excluded_folders: {}", list(&rc.exclusions.folders));
            println!("excluded_files: {}", list(&rc.exclusions.files));
            println!("on_read_error: {}", rc.on_read_error);
        }
        Err(e) => {
            println!("FAIL mdexp doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}

fn list(items: &[String]) -> String {
    if items.is_empty() { "(none)".to_string() } else { items.join(", ") }
}

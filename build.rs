//! Build script for genrecli.
//!
//! Copies the configuration template and the demo taxonomy to the user's
//! local data directory so that a fresh install has a `.env.example` to start
//! from and a `genres/` directory the CLI can load right away.
//!
//! Destination:
//! - Linux: `~/.local/share/genrecli/`
//! - macOS: `~/Library/Application Support/genrecli/`
//! - Windows: `%LOCALAPPDATA%/genrecli/`
//!
//! Existing class documents are never overwritten; they may already carry
//! genres added during triage.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");
    println!("cargo:rerun-if-changed=demos/genres");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("genrecli");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    let demo_genres = manifest_dir.join("demos").join("genres");
    if demo_genres.is_dir() {
        let genres_dir = out_dir.join("genres");
        fs::create_dir_all(&genres_dir)?;
        for entry in fs::read_dir(&demo_genres)? {
            let path = entry?.path();
            let Some(name) = path.file_name() else {
                continue;
            };
            let target = genres_dir.join(name);
            if path.extension().is_some_and(|ext| ext == "json") && !target.exists() {
                fs::copy(&path, target)?;
            }
        }
    }

    Ok(())
}

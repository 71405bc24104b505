//! `objinfo`: load an OBJ model and summarize the assembled mesh.
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use asset::{LoaderFactory, Mesh};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "objinfo")]
#[command(about = "Load an OBJ model and summarize its vertex and index buffers")]
#[command(version)]
struct Args {
    /// Model file to load (.obj)
    path: PathBuf,

    /// Skip `mtllib` directives; groups are left without materials
    #[arg(long)]
    no_materials: bool,

    /// Print every triangle's output vertex indices
    #[arg(long)]
    dump_indices: bool,
}

fn print_summary(mesh: &Mesh, dump_indices: bool) {
    println!(
        "{} vertices, {} triangles, {} groups",
        mesh.vertices.len(),
        mesh.triangle_count(),
        mesh.groups.len()
    );

    for group in &mesh.groups {
        let material = group
            .material
            .as_ref()
            .map_or("<none>", |material| material.name.as_str());
        println!(
            "  group '{}': {} triangles, material {}",
            group.name,
            group.triangle_count(),
            material
        );

        if dump_indices {
            for [a, b, c] in group.triangles() {
                println!("    {a} {b} {c}");
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!(
        "Loading {} (materials: {})",
        args.path.display(),
        !args.no_materials
    );

    let mesh = LoaderFactory::new()
        .with_materials(!args.no_materials)
        .load(&args.path)
        .with_context(|| format!("Failed to load model: {}", args.path.display()))?;

    if !mesh.is_valid() {
        log::warn!("{} contains no triangles", args.path.display());
    }
    print_summary(&mesh, args.dump_indices);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_path() {
        let args = Args::try_parse_from(["objinfo", "--no-materials", "ship.obj"]).expect("args");
        assert_eq!(args.path, PathBuf::from("ship.obj"));
        assert!(args.no_materials);
        assert!(!args.dump_indices);
    }

    #[test]
    fn path_is_required() {
        assert!(Args::try_parse_from(["objinfo"]).is_err());
    }
}

//! Generate seed corpus for fuzzing

use gamearchive_rs::{Archive, ArchiveFile, ArchiveHandler, DatFastHandler};
use std::fs;

fn write_seed(
    corpus_dir: &str,
    name: &str,
    archive: Archive<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = DatFastHandler.generate(&archive)?;
    let path = format!("{}/{}", corpus_dir, name);
    fs::write(&path, &bundle.main)?;
    println!("✓ Generated: {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let corpus_dir = "fuzz/corpus/fuzz_archive_parse";
    fs::create_dir_all(corpus_dir)?;

    println!("Generating seed corpus...");

    // Seed 1: Empty archive (no files)
    write_seed(corpus_dir, "seed_empty.dat", Archive::new())?;

    // Seed 2: Single stored file
    write_seed(
        corpus_dir,
        "seed_single_stored.dat",
        Archive::from_iter([ArchiveFile::from_content("README.TXT", b"Hello, World!".to_vec())
            .with_compression(Some(false))]),
    )?;

    // Seed 3: One file of each mapped type
    write_seed(
        corpus_dir,
        "seed_types.dat",
        Archive::from_iter([
            ArchiveFile::from_content("LEVEL1.mif", vec![1; 16]),
            ArchiveFile::from_content("LEVEL1.mbg", vec![2; 64]),
            ArchiveFile::from_content("LEVEL1.mfg", vec![3; 64]),
            ArchiveFile::from_content("JUMP.SND", vec![4; 8]),
            ArchiveFile::from_content("EGA.pal", (0..48).collect::<Vec<u8>>()),
            ArchiveFile::from_content("HERO.spr", vec![5; 32]),
        ]),
    )?;

    // Seed 4: Large compressible file
    write_seed(
        corpus_dir,
        "seed_large.dat",
        Archive::from_iter([ArchiveFile::from_content(
            "CASTLE.tbg",
            b"This is test data for compression. ".repeat(1000),
        )]),
    )?;

    // Seed 5: Escape bytes and long runs
    let mut runs = vec![0x90; 600];
    runs.extend((0..255).collect::<Vec<u8>>());
    write_seed(
        corpus_dir,
        "seed_runs.dat",
        Archive::from_iter([ArchiveFile::from_content("RUNS.msp", runs)]),
    )?;

    // Seed 6: Empty file (zero bytes)
    write_seed(
        corpus_dir,
        "seed_zero_length.dat",
        Archive::from_iter([ArchiveFile::from_content("EMPTY.pbg", Vec::new())]),
    )?;

    println!("\nGenerated 6 seed files in {}", corpus_dir);
    Ok(())
}

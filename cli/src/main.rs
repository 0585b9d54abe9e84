// Bring up a RAM disk, show its layout and optionally dump the image
//
// Usage: ramdisk-cli [--sectors N] [--utc-offset H] [--dump PATH] [--verbose]

use std::fs;
use std::io;
use std::process;

use ramdisk_core::disk::SECTOR_SIZE;
use ramdisk_core::logger::{self, Level};
use ramdisk_core::{BlockRequest, RamDisk, RamDiskConfig, RamSectorStore};

/// Sectors per scatter segment when dumping the image.
const DUMP_SEGMENT_SECTORS: usize = 64;

struct Options {
    config: RamDiskConfig,
    dump: Option<String>,
    verbose: bool,
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} [--sectors N] [--utc-offset H] [--dump PATH] [--verbose]",
        program
    );
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let program = args.first().map(String::as_str).unwrap_or("ramdisk-cli");
    let mut options = Options {
        config: RamDiskConfig::default(),
        dump: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--sectors", Some(v)) => match v.parse() {
                Ok(n) => options.config = options.config.sectors(n),
                Err(_) => usage(program),
            },
            ("--utc-offset", Some(v)) => match v.parse() {
                Ok(h) => options.config = options.config.utc_offset(h),
                Err(_) => usage(program),
            },
            ("--dump", Some(v)) => options.dump = Some(v.clone()),
            ("--verbose", _) => {
                options.verbose = true;
                i += 1;
                continue;
            }
            _ => usage(program),
        }
        i += 2;
    }
    options
}

fn dump_image(disk: &mut RamDisk<RamSectorStore>, path: &str) -> io::Result<()> {
    let mut image = vec![0u8; disk.capacity() as usize * SECTOR_SIZE];
    let segments: Vec<&mut [u8]> = image
        .chunks_mut(DUMP_SEGMENT_SECTORS * SECTOR_SIZE)
        .collect();

    let done = disk
        .submit(BlockRequest::read(0, segments))
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    fs::write(path, &image)?;

    println!(
        "Dumped {} sectors in {} segments to {}",
        done.sectors, done.segments, path
    );
    Ok(())
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args);
    if options.verbose {
        logger::set_max_level(Level::Debug);
    }

    let store = RamSectorStore::from_config(&options.config);
    let mut disk = match RamDisk::bring_up_now(store, options.config) {
        Ok(disk) => disk,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            for record in logger::get_logs() {
                eprintln!("[{}] {}", record.level().as_str(), record.message());
            }
            process::exit(1);
        }
    };

    let geometry = disk.geometry();
    println!(
        "{}: {} sectors, C/H/S {}/{}/{}, minors {}+{}",
        disk.name(),
        disk.capacity(),
        geometry.cylinders,
        geometry.heads,
        geometry.sectors,
        disk.first_minor(),
        disk.minor_count()
    );

    let ebrs: Vec<String> = disk
        .boot_records()
        .ebrs
        .iter()
        .map(|ebr| format!("LBA {} (byte {})", ebr.lba(), ebr.byte_offset()))
        .collect();
    println!(
        "  boot records stamped at UTC{:+}: MBR at LBA 0, EBRs at {}",
        disk.config().utc_offset_hours,
        ebrs.join(", ")
    );

    match disk.partitions() {
        Ok(parts) => {
            for p in parts.iter() {
                println!(
                    "  {}{:<2} {:<14} start {:>6}  end {:>6}  {:>6} KB{}",
                    disk.name(),
                    p.index,
                    p.type_name(),
                    p.start_lba,
                    p.end_lba(),
                    p.size_kb(),
                    if p.logical { "  (logical)" } else { "" }
                );
            }
        }
        Err(e) => eprintln!("WARNING: partition scan failed: {}", e),
    }

    if let Some(path) = options.dump.as_deref() {
        dump_image(&mut disk, path)?;
    }

    if options.verbose {
        for record in logger::get_logs() {
            println!("[{}] {}", record.level().as_str(), record.message());
        }
    }

    disk.teardown();
    Ok(())
}

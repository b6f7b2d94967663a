//! Tests for command-line parsing and the extract and generate commands

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tilewave::TilewaveError;
    use tilewave::algorithm::executor::BoundaryMode;
    use tilewave::io::cli::{Cli, Command, CommandProcessor};
    use tilewave::io::configuration::{DEFAULT_GRID_SIZE, DEFAULT_SEED};

    // Two layers: a floor of base blocks under a layer of air
    const INFO: &str = "4 ways symmetric:Air,Base\n\
                        2 ways symmetric:\n\
                        template size x:2\n\
                        template size y:2\n\
                        template size z:2\n\
                        tile size x:1\n\
                        tile size y:1\n\
                        tile size z:1\n";

    fn template_folder() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("info.txt"), INFO).unwrap();
        let placements: String = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .iter()
            .map(|(x, y)| format!("Base||{x}||{y}||0||1||0||0||0\n"))
            .collect();
        fs::write(dir.path().join("template_data.txt"), placements).unwrap();
        dir
    }

    fn folder_arg(dir: &TempDir) -> String {
        dir.path().to_str().unwrap().to_string()
    }

    // Tests the generate command falls back to its documented defaults
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["tilewave", "generate", "levels"]);
        let Command::Generate(args) = cli.command else {
            unreachable!("Expected the generate command");
        };

        assert_eq!(args.folder, PathBuf::from("levels"));
        assert_eq!(args.dims().unwrap(), DEFAULT_GRID_SIZE);
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.boundary, BoundaryMode::Propagate);
        assert_eq!(args.ground, "Base");
        assert_eq!(args.ceiling, "Air");
        assert_eq!(args.output, PathBuf::from("level.txt"));
        assert!(!cli.quiet);
        assert_eq!(cli.log_level, "warn");
    }

    // Tests every generate option including short flags
    #[test]
    fn test_generate_all_args() {
        let cli = Cli::parse_from([
            "tilewave",
            "generate",
            "levels",
            "--size",
            "6",
            "3",
            "5",
            "-s",
            "7",
            "-b",
            "replicate",
            "--ground",
            "Floor",
            "--ceiling",
            "Roof",
            "-o",
            "out.txt",
        ]);
        let Command::Generate(args) = cli.command else {
            unreachable!("Expected the generate command");
        };

        assert_eq!(args.dims().unwrap(), [6, 3, 5]);
        assert_eq!(args.seed, 7);
        assert_eq!(args.boundary, BoundaryMode::Replicate);
        assert_eq!(args.ground, "Floor");
        assert_eq!(args.ceiling, "Roof");
        assert_eq!(args.output, PathBuf::from("out.txt"));
    }

    // Tests quiet and log level are accepted on either side of the subcommand
    // Verified by removing the global attribute
    #[test]
    fn test_global_flags() {
        let before = Cli::parse_from(["tilewave", "--quiet", "extract", "levels"]);
        assert!(!before.should_show_progress());

        let after = Cli::parse_from(["tilewave", "extract", "levels", "-q", "--log-level", "debug"]);
        assert!(after.quiet);
        assert_eq!(after.log_level, "debug");
        assert!(matches!(after.command, Command::Extract { .. }));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["tilewave"]).is_err());
        assert!(Cli::try_parse_from(["tilewave", "generate", "levels", "-b", "mirror"]).is_err());
        assert!(Cli::try_parse_from(["tilewave", "generate", "levels", "--size", "4", "4"]).is_err());
    }

    // Tests extraction writes both artifacts into the template folder
    #[test]
    fn test_extract_writes_artifacts() {
        let dir = template_folder();
        let folder = folder_arg(&dir);
        let processor =
            CommandProcessor::new(Cli::parse_from(["tilewave", "--quiet", "extract", folder.as_str()]));

        let catalog = processor.extract(dir.path()).unwrap();

        assert!(!catalog.is_empty());
        let patterns = fs::read_to_string(dir.path().join("patterns.txt")).unwrap();
        assert_eq!(patterns.lines().count(), catalog.len());
        let modules = fs::read_to_string(dir.path().join("modules.txt")).unwrap();
        assert!(modules.starts_with("Air||0||"));
    }

    // Tests a full extract then generate run produces a floor under air
    // Verified by swapping ground and ceiling layers in seeding
    #[test]
    fn test_extract_then_generate() {
        let dir = template_folder();
        let folder = folder_arg(&dir);
        CommandProcessor::new(Cli::parse_from(["tilewave", "-q", "extract", folder.as_str()]))
            .process()
            .unwrap();
        CommandProcessor::new(Cli::parse_from([
            "tilewave", "-q", "generate", folder.as_str(), "--size", "3", "2", "3",
        ]))
        .process()
        .unwrap();

        let level = fs::read_to_string(dir.path().join("level.txt")).unwrap();
        assert_eq!(level.lines().count(), 9);
        for line in level.lines() {
            let fields: Vec<&str> = line.split("||").collect();
            assert_eq!(fields.get(1), Some(&"0"), "{line}");
            assert_eq!(fields.get(4), Some(&"Base"), "{line}");
        }
    }

    // Tests generation without extracted artifacts fails on the missing file
    #[test]
    fn test_generate_without_catalog() {
        let dir = template_folder();
        let folder = folder_arg(&dir);
        let result = CommandProcessor::new(Cli::parse_from(["tilewave", "-q", "generate", folder.as_str()]))
            .process();
        assert!(matches!(result, Err(TilewaveError::FileSystem { .. })));
    }

    // Tests an unknown ground type is reported by name
    #[test]
    fn test_generate_unknown_ground() {
        let dir = template_folder();
        let folder = folder_arg(&dir);
        CommandProcessor::new(Cli::parse_from(["tilewave", "-q", "extract", folder.as_str()]))
            .process()
            .unwrap();
        let result = CommandProcessor::new(Cli::parse_from([
            "tilewave", "-q", "generate", folder.as_str(), "--ground", "Lava",
        ]))
        .process();
        assert!(matches!(
            result,
            Err(TilewaveError::UnknownModuleType { kind }) if kind == "Lava"
        ));
    }
}

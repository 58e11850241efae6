//! Integration tests for CLI functionality

#[cfg(feature = "cli")]
mod cli_integration_tests {
    use std::fs;
    use tempfile::TempDir;

    use libahocorasick::cli::args::{SerializationFormat, TreeSource};
    use libahocorasick::cli::commands::{
        execute, load_tree, read_keywords, resolve_tree, save_tree, TreeStats,
    };
    use libahocorasick::cli::Commands;
    use libahocorasick::cli::detect::{detect_format, DetectionMethod};
    use libahocorasick::prelude::*;

    fn sample_tree() -> KeywordTree {
        KeywordTree::from_keywords_case_insensitive(["malaga", "lacrosse", "mallorca", "orca"])
    }

    fn source(keywords: Option<std::path::PathBuf>, automaton: Option<std::path::PathBuf>) -> TreeSource {
        TreeSource {
            keywords,
            automaton,
            format: None,
            case_insensitive: false,
        }
    }

    #[test]
    fn test_read_keywords_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keywords.txt");
        fs::write(&path, "malaga\r\n\n  \nmallorca bella\norca\n").unwrap();

        let keywords = read_keywords(&path).unwrap();
        assert_eq!(keywords, vec!["malaga", "mallorca bella", "orca"]);
    }

    #[test]
    fn test_read_keywords_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_keywords(&temp_dir.path().join("absent.txt")).is_err());
    }

    #[test]
    fn test_save_and_load_every_format() {
        let temp_dir = TempDir::new().unwrap();
        let tree = sample_tree();

        for (name, format, gzip) in [
            ("tree.bin", SerializationFormat::Bincode, false),
            ("tree.json", SerializationFormat::Json, false),
            ("tree.bin.gz", SerializationFormat::Bincode, true),
            ("tree.json.gz", SerializationFormat::Json, true),
        ] {
            let path = temp_dir.path().join(name);
            save_tree(&tree, &path, format, gzip).unwrap();

            let detection = detect_format(&path, None).unwrap();
            assert_eq!(detection.format, format, "{}", name);
            assert_eq!(detection.gzip, gzip, "{}", name);
            assert_eq!(detection.method, DetectionMethod::Extension);

            let loaded = load_tree(&path, None).unwrap();
            assert_eq!(loaded, tree, "{}", name);
        }
    }

    #[test]
    fn test_detect_format_by_content() {
        let temp_dir = TempDir::new().unwrap();
        let tree = sample_tree();

        let json = temp_dir.path().join("automaton");
        save_tree(&tree, &json, SerializationFormat::Json, true).unwrap();
        let detection = detect_format(&json, None).unwrap();
        assert_eq!(detection.format, SerializationFormat::Json);
        assert!(detection.gzip);
        assert_eq!(detection.method, DetectionMethod::Content);

        let binary = temp_dir.path().join("automaton.dat");
        save_tree(&tree, &binary, SerializationFormat::Bincode, false).unwrap();
        let detection = detect_format(&binary, None).unwrap();
        assert_eq!(detection.format, SerializationFormat::Bincode);
        assert!(!detection.gzip);
        assert_eq!(load_tree(&binary, None).unwrap(), tree);
    }

    #[test]
    fn test_user_specified_format_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.txt");
        save_tree(&sample_tree(), &path, SerializationFormat::Json, false).unwrap();

        let detection = detect_format(&path, Some(SerializationFormat::Json)).unwrap();
        assert_eq!(detection.format, SerializationFormat::Json);
        assert_eq!(detection.method, DetectionMethod::UserSpecified);
    }

    #[test]
    fn test_detect_empty_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.bin");
        fs::write(&path, b"").unwrap();
        assert!(detect_format(&path, None).is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.json");
        fs::write(&path, "{\"finalized\": true}").unwrap();
        assert!(load_tree(&path, None).is_err());
    }

    #[test]
    fn test_resolve_tree_from_keywords() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keywords.txt");
        fs::write(&path, "Malaga\norca\n").unwrap();

        let mut src = source(Some(path), None);
        src.case_insensitive = true;
        let tree = resolve_tree(&src).unwrap();
        assert!(tree.is_finalized());
        assert!(tree.is_case_insensitive());
        assert_eq!(
            tree.search("MALAGA").unwrap().map(|m| m.as_tuple()),
            Some(("Malaga", 0))
        );
    }

    #[test]
    fn test_resolve_tree_from_automaton() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        save_tree(&sample_tree(), &path, SerializationFormat::Json, false).unwrap();

        let tree = resolve_tree(&source(None, Some(path))).unwrap();
        assert_eq!(tree, sample_tree());
        assert!(resolve_tree(&source(None, None)).is_err());
    }

    fn write_inputs(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let keywords = dir.path().join("keywords.txt");
        fs::write(&keywords, "mallorca\norca\nmallorca bella\nlacrosse\n").unwrap();
        let text = dir.path().join("text.txt");
        fs::write(&text, "malheur on mallorca bellacrosse").unwrap();
        (keywords, text)
    }

    fn build(keywords: &std::path::Path, output: &std::path::Path, unfinalized: bool) -> anyhow::Result<()> {
        execute(Commands::Build {
            keywords: keywords.to_path_buf(),
            output: output.to_path_buf(),
            format: None,
            gzip: false,
            case_insensitive: true,
            no_shortcuts: false,
            unfinalized,
        })
    }

    #[test]
    fn test_execute_build_then_search() {
        let temp_dir = TempDir::new().unwrap();
        let (keywords, text) = write_inputs(&temp_dir);
        let automaton = temp_dir.path().join("tree.json.gz");

        build(&keywords, &automaton, false).unwrap();
        let loaded = load_tree(&automaton, None).unwrap();
        assert!(loaded.is_finalized());
        assert_eq!(loaded.keyword_count(), 4);

        execute(Commands::Search {
            text: Some(text.clone()),
            source: source(None, Some(automaton)),
            all: true,
            timings: true,
        })
        .unwrap();

        execute(Commands::Search {
            text: Some(text),
            source: source(Some(keywords), None),
            all: false,
            timings: false,
        })
        .unwrap();
    }

    #[test]
    fn test_execute_search_rejects_unfinalized_automaton() {
        let temp_dir = TempDir::new().unwrap();
        let (keywords, text) = write_inputs(&temp_dir);
        let automaton = temp_dir.path().join("tree.bin");

        build(&keywords, &automaton, true).unwrap();
        assert!(!load_tree(&automaton, None).unwrap().is_finalized());

        let err = execute(Commands::Search {
            text: Some(text),
            source: source(None, Some(automaton)),
            all: true,
            timings: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("Automaton is not finalized"));
    }

    #[test]
    fn test_execute_info() {
        let temp_dir = TempDir::new().unwrap();
        let (keywords, _) = write_inputs(&temp_dir);
        let automaton = temp_dir.path().join("tree.bin");
        build(&keywords, &automaton, false).unwrap();

        execute(Commands::Info {
            source: source(None, Some(automaton.clone())),
        })
        .unwrap();

        let stats = TreeStats::of(&load_tree(&automaton, None).unwrap());
        assert_eq!(stats.keywords, 4);
        assert_eq!(stats.trie_edges, stats.states - 1);
        assert!(stats.shortcuts > 0);

        assert!(execute(Commands::Info {
            source: source(None, Some(temp_dir.path().join("absent.bin"))),
        })
        .is_err());
    }

    #[test]
    fn test_execute_dot_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let (keywords, _) = write_inputs(&temp_dir);
        let output = temp_dir.path().join("tree.dot");

        execute(Commands::Dot {
            source: source(Some(keywords), None),
            failure_links: true,
            shortcuts: false,
            output: Some(output.clone()),
        })
        .unwrap();

        let dot = fs::read_to_string(&output).unwrap();
        assert!(dot.starts_with("digraph keyword_tree {"));
        assert!(dot.contains("style=dashed"));
        assert!(!dot.contains("style=dotted"));
    }

    #[test]
    fn test_execute_bench() {
        let temp_dir = TempDir::new().unwrap();
        let (keywords, text) = write_inputs(&temp_dir);

        execute(Commands::Bench {
            keywords,
            text,
            iterations: 3,
            case_insensitive: true,
        })
        .unwrap();
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_execute_bench_rejects_oversized_iterations() {
        let temp_dir = TempDir::new().unwrap();
        let (keywords, text) = write_inputs(&temp_dir);

        let err = execute(Commands::Bench {
            keywords,
            text,
            iterations: u32::MAX as usize + 1,
            case_insensitive: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("--iterations"));
    }
}

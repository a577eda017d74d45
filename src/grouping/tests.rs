#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;
    use crate::config::Config;
    use crate::grouping::{group_file, GroupingProcessor, GroupingStats};

    fn run_with(config: Config, input: &str) -> (String, GroupingStats) {
        let processor = GroupingProcessor::new(config).unwrap();
        let mut out = Vec::new();
        let stats = processor.process_reader(Cursor::new(input.as_bytes()), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    fn run(input: &str) -> (String, GroupingStats) {
        run_with(Config::default(), input)
    }

    #[test]
    fn test_shared_field_forms_group() {
        let (report, stats) = run("B;1;Y\nA;1;X\nC;2;Z\n");

        assert_eq!(report, "Groups count: 1\n\nGroup 1\nA;1;X\nB;1;Y\n\n");
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.grouped_records, 2);
    }

    #[test]
    fn test_duplicates_alone_do_not_group() {
        let (report, stats) = run("A;1;X\nA;1;X\nA;1;X\n");

        assert_eq!(report, "Groups count: 0\n\n");
        assert_eq!(stats.records, 1);
        assert_eq!(stats.duplicates_removed, 2);
    }

    #[test]
    fn test_transitive_grouping() {
        // a and c share nothing directly; b links them.
        let (report, _) = run("a;1;p\nb;1;q\nc;2;q\nd;3;r\n");

        assert_eq!(report, "Groups count: 1\n\nGroup 1\na;1;p\nb;1;q\nc;2;q\n\n");
    }

    #[test]
    fn test_empty_fields_are_neutral() {
        let (report, _) = run("X;;1\nY;;1\nZ;;2\n");
        assert_eq!(report, "Groups count: 1\n\nGroup 1\nX;;1\nY;;1\n\n");

        let (report, _) = run("X;;1\nY;;2\n");
        assert_eq!(report, "Groups count: 0\n\n");
    }

    #[test]
    fn test_quoted_delimiter_is_one_field() {
        // Joined by the quoted first field; "a" and "b" alone never match it.
        let (report, _) = run("\"a;b\";2;3\n\"a;b\";9;9\na;b;7\n");
        assert_eq!(report, "Groups count: 1\n\nGroup 1\n\"a;b\";2;3\n\"a;b\";9;9\n\n");
    }

    #[test]
    fn test_quotes_stripped_for_matching_only() {
        let (report, _) = run("\"1\";x\n1;y\n");
        assert_eq!(report, "Groups count: 1\n\nGroup 1\n\"1\";x\n1;y\n\n");
    }

    #[test]
    fn test_invalid_lines_are_skipped() {
        let (report, stats) = run("\n   \nno delimiter\n\"open;1\nA;1\nB;1\n");

        assert_eq!(report, "Groups count: 1\n\nGroup 1\nA;1\nB;1\n\n");
        assert_eq!(stats.invalid_lines, 4);
        assert_eq!(stats.lines_read, 6);
    }

    #[test]
    fn test_carriage_return_terminated_lines() {
        let (report, stats) = run("A;1\rB;1\r");

        assert_eq!(report, "Groups count: 1\n\nGroup 1\nA;1\nB;1\n\n");
        assert_eq!(stats.lines_read, 2);
    }

    #[test]
    fn test_unbounded_memory_limit() {
        let mut config = Config::default();
        config.processing.max_memory_usage_mb = u64::MAX;
        config.processing.memory_check_interval_records = 1;

        let (report, stats) = run_with(config, "A;1\nB;1\n");
        assert_eq!(report, "Groups count: 1\n\nGroup 1\nA;1\nB;1\n\n");
        assert_eq!(stats.groups, 1);
    }

    #[test]
    fn test_groups_ordered_by_size_then_first_appearance() {
        let input = "q;2\nz;1\nr;2\na;1\nm;3\nn;3\no;3\n";
        let (report, _) = run(input);

        let expected = "Groups count: 3\n\n\
                        Group 1\nm;3\nn;3\no;3\n\n\
                        Group 2\nq;2\nr;2\n\n\
                        Group 3\na;1\nz;1\n\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_output_is_deterministic() {
        let input: String = (0..500)
            .map(|i| format!("k{};{};{}\n", i % 37, i % 11, i % 53))
            .collect();

        let (first, _) = run(&input);
        let (second, _) = run(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_spill_store_matches_memory_store() {
        let temp_dir = tempdir().unwrap();
        let input: String = (0..300)
            .map(|i| format!("\"id {}\";{};{};\n", i % 90, i % 17, (i * 7) % 101))
            .collect();

        let mut config = Config::default();
        config.processing.spill_to_disk = true;
        config.io.temp_directory = temp_dir.path().to_path_buf();

        let (spilled, spilled_stats) = run_with(config, &input);
        let (in_memory, memory_stats) = run(&input);

        assert_eq!(spilled, in_memory);
        assert_eq!(spilled_stats.records, memory_stats.records);
        assert_eq!(spilled_stats.duplicates_removed, memory_stats.duplicates_removed);

        // The spill file does not outlive the run.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_group_file_writes_report() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("input.txt");
        let output = temp_dir.path().join("groups.txt");
        fs::write(&input, "A;1;X\nB;1;Y\nC;2;Z\n").unwrap();

        let stats = group_file(&input, &output, Config::default()).unwrap();

        assert_eq!(stats.groups, 1);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "Groups count: 1\n\nGroup 1\nA;1;X\nB;1;Y\n\n"
        );
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("groups.txt");

        let result = group_file(&temp_dir.path().join("absent.txt"), &output, Config::default());

        assert!(result.is_err());
        assert!(!output.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}

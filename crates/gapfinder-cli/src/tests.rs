use super::*;

#[test]
fn parses_analyze_channel_command() {
    let cli = Cli::try_parse_from([
        "gapfinder",
        "analyze-channel",
        "--channel-url",
        "https://www.youtube.com/@chefmaison",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::AnalyzeChannel {
            ref channel_url,
            max_videos: None,
        } if channel_url == "https://www.youtube.com/@chefmaison"
    ));
}

#[test]
fn parses_max_videos_override() {
    let cli = Cli::try_parse_from([
        "gapfinder",
        "analyze-channel",
        "--channel-url",
        "UC_x5XG1OV2P6uZZ5FSM9Ttw",
        "--max-videos",
        "20",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::AnalyzeChannel {
            max_videos: Some(20),
            ..
        }
    ));
}

#[test]
fn parses_analyze_topic_command() {
    let cli = Cli::try_parse_from(["gapfinder", "analyze-topic", "--topic", "pizza"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::AnalyzeTopic { ref topic } if topic == "pizza"));
}

#[test]
fn parses_analyze_file_with_optional_aggregates() {
    let cli = Cli::try_parse_from(["gapfinder", "analyze-file", "--videos", "videos.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::AnalyzeFile {
            aggregates: None,
            ..
        }
    ));

    let cli = Cli::try_parse_from([
        "gapfinder",
        "analyze-file",
        "--videos",
        "videos.json",
        "--aggregates",
        "aggs.json",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::AnalyzeFile {
            aggregates: Some(ref p),
            ..
        } if p == &PathBuf::from("aggs.json")
    ));
}

#[test]
fn global_options_follow_the_subcommand() {
    let cli = Cli::try_parse_from([
        "gapfinder",
        "score-gaps",
        "--aggregates",
        "aggs.json",
        "--tuning",
        "tuning.yaml",
        "--pos-lexicon",
        "fr.tsv",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.tuning, Some(PathBuf::from("tuning.yaml")));
    assert_eq!(cli.pos_lexicon, Some(PathBuf::from("fr.tsv")));
    assert!(matches!(cli.command, Commands::ScoreGaps { .. }));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["gapfinder"]).is_err());
}

#[test]
fn analyze_channel_requires_url() {
    assert!(Cli::try_parse_from(["gapfinder", "analyze-channel"]).is_err());
}

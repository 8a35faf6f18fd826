use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["afs-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["afs-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["afs-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_amendments_create() {
    let cli = Cli::try_parse_from([
        "afs-cli",
        "amendments",
        "create",
        "--title",
        "Water Rights",
        "--description",
        "Caps agricultural draw",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Amendments {
            command: AmendmentCommands::Create { ref title, ref description }
        }) if title == "Water Rights" && description == "Caps agricultural draw"
    ));
}

#[test]
fn amendments_create_requires_title() {
    let result = Cli::try_parse_from(["afs-cli", "amendments", "create", "--description", "x"]);
    assert!(result.is_err());
}

#[test]
fn parses_feedback_submit_defaults_to_storing() {
    let cli = Cli::try_parse_from([
        "afs-cli",
        "feedback",
        "submit",
        "--amendment-id",
        "3",
        "--text",
        "Looks reasonable",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Feedback {
            command: FeedbackCommands::Submit {
                amendment_id: 3,
                dry_run: false,
                ..
            }
        })
    ));
}

#[test]
fn parses_feedback_submit_dry_run() {
    let cli = Cli::try_parse_from([
        "afs-cli",
        "feedback",
        "submit",
        "--amendment-id",
        "3",
        "--text",
        "Looks reasonable",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Feedback {
            command: FeedbackCommands::Submit { dry_run: true, .. }
        })
    ));
}

#[test]
fn feedback_list_limit_defaults_to_twenty() {
    let cli = Cli::try_parse_from(["afs-cli", "feedback", "list", "--amendment-id", "7"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Feedback {
            command: FeedbackCommands::List {
                amendment_id: 7,
                limit: 20
            }
        })
    ));
}

#[test]
fn parses_feedback_insights() {
    let cli = Cli::try_parse_from([
        "afs-cli",
        "feedback",
        "insights",
        "--amendment-id",
        "7",
        "--terms",
        "5",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Feedback {
            command: FeedbackCommands::Insights {
                amendment_id: 7,
                terms: 5
            }
        })
    ));
}

#[test]
fn parses_analyze_text() {
    let cli = Cli::try_parse_from(["afs-cli", "analyze", "--text", "Fair and clear"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analyze { text: Some(ref text), csv: None, .. }) if text == "Fair and clear"
    ));
}

#[test]
fn parses_analyze_csv_with_terms() {
    let cli = Cli::try_parse_from(["afs-cli", "analyze", "--csv", "comments.csv", "--terms", "5"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analyze { text: None, csv: Some(ref path), terms: 5 })
            if path == std::path::Path::new("comments.csv")
    ));
}

#[test]
fn analyze_requires_text_or_csv() {
    assert!(Cli::try_parse_from(["afs-cli", "analyze"]).is_err());
}

#[test]
fn analyze_rejects_text_and_csv_together() {
    let result =
        Cli::try_parse_from(["afs-cli", "analyze", "--text", "hi", "--csv", "comments.csv"]);
    assert!(result.is_err());
}

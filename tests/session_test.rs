mod common;

use anyhow::Result;
use common::test_session;
use kasa::application::Settings;
use kasa::domain::Currency;
use kasa::io::SessionSnapshot;

async fn run_script(settings: Settings, script: &str) -> Result<String> {
    let mut session = test_session(settings);
    let mut out = Vec::new();
    session.run(script.as_bytes(), &mut out, false).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn test_session_records_and_lists_entries() -> Result<()> {
    let out = run_script(
        Settings::default(),
        "income 100\nexpense 40 EUR --date 2024-01-20\nlist\n",
    )
    .await?;

    assert!(out.contains("Added income: USD 100.00 (1/15/24)"));
    assert!(out.contains("Added expense: EUR -40.00 (1/20/24)"));
    assert!(out.contains("   0  USD 100.00       1/15/24"));
    assert!(out.contains("   1  EUR -40.00       1/20/24"));
    Ok(())
}

#[tokio::test]
async fn test_session_balance_overlay() -> Result<()> {
    let out = run_script(
        Settings::default().with_show_balance(true),
        "income 100\nexpense 40 EUR\n",
    )
    .await?;

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Added income: USD 100.00 (1/15/24)",
            "Balance: 100.00",
            "Added expense: EUR -40.00 (1/15/24)",
            "Balance: 60.00",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_session_silently_drops_bad_amount() -> Result<()> {
    let out = run_script(Settings::default(), "income abc\nlist\n").await?;
    assert_eq!(out, "No entries.\n");
    Ok(())
}

#[tokio::test]
async fn test_session_stops_at_quit() -> Result<()> {
    let out = run_script(Settings::default(), "income 1\nquit\nincome 2\n").await?;
    assert_eq!(out.lines().count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_session_uses_configured_currency_and_format() -> Result<()> {
    let settings = Settings::default()
        .with_default_currency(Currency::Try)
        .with_date_format("%d.%m.%Y");
    let out = run_script(settings, "expense 12.5\n").await?;
    assert_eq!(out, "Added expense: TRY -12.50 (15.01.2024)\n");
    Ok(())
}

#[tokio::test]
async fn test_session_export_json() -> Result<()> {
    let out = run_script(
        Settings::default(),
        "income 10\nexpense 2.5 TRY\nexport json\n",
    )
    .await?;

    let json_start = out.find('{').expect("json in output");
    let snapshot: SessionSnapshot = serde_json::from_str(&out[json_start..])?;
    assert_eq!(snapshot.entries.len(), 2);
    assert_eq!(snapshot.balance, 7.5);
    assert_eq!(snapshot.entries[1].currency, Currency::Try);
    Ok(())
}

#[tokio::test]
async fn test_session_errors_do_not_end_session() -> Result<()> {
    let out = run_script(
        Settings::default(),
        "delete 0\nincome 5 XYZ\nfoo\nincome 5\n",
    )
    .await?;

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("error: No entry at position 0"));
    assert!(lines[1].starts_with("error: Invalid currency"));
    assert!(lines[2].starts_with("error:"));
    assert_eq!(lines[3], "Added income: USD 5.00 (1/15/24)");
    Ok(())
}

#[tokio::test]
async fn test_session_survives_undecodable_line() -> Result<()> {
    let mut session = test_session(Settings::default());
    let mut out = Vec::new();
    let input: &[u8] = b"income 10\n\xff\xfe\nincome 5\nlist\n";
    session.run(input, &mut out, false).await?;

    let out = String::from_utf8(out)?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Added income: USD 10.00 (1/15/24)");
    assert!(lines[1].starts_with("error:"));
    assert_eq!(lines[2], "Added income: USD 5.00 (1/15/24)");
    assert!(out.contains("   1  USD 5.00         1/15/24"));
    assert_eq!(session.tracker().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_session_accepts_last_line_without_newline() -> Result<()> {
    let out = run_script(Settings::default(), "income 3\r\nexpense 1").await?;
    assert_eq!(
        out,
        "Added income: USD 3.00 (1/15/24)\nAdded expense: USD -1.00 (1/15/24)\n"
    );
    Ok(())
}

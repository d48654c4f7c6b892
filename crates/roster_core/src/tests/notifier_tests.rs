use super::*;

fn notifier() -> (Notifier, broadcast::Receiver<SessionEvent>) {
    let (events, rx) = broadcast::channel(16);
    (Notifier::new(Duration::from_secs(5), events), rx)
}

fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        seen.push(event);
    }
    seen
}

fn hidden_count(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, SessionEvent::NoticeHidden))
        .count()
}

#[tokio::test(start_paused = true)]
async fn notice_hides_after_configured_delay() {
    let (notifier, mut rx) = notifier();

    notifier.notify("Signed up", Severity::Success).await;
    let shown = notifier.visible().await.expect("visible");
    assert_eq!(shown.text, "Signed up");
    assert_eq!(shown.severity, Severity::Success);

    tokio::time::sleep(Duration::from_millis(4_999)).await;
    assert!(notifier.visible().await.is_some());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(notifier.visible().await.is_none());

    let events = drain(&mut rx);
    assert!(matches!(events.first(), Some(SessionEvent::NoticeShown(_))));
    assert_eq!(hidden_count(&events), 1);
}

#[tokio::test(start_paused = true)]
async fn second_notice_replaces_first_and_restarts_timer() {
    let (notifier, mut rx) = notifier();

    notifier.notify("first", Severity::Info).await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    notifier.notify("second", Severity::Error).await;

    // Past the first notice's deadline: its timer must not hide the second.
    tokio::time::sleep(Duration::from_secs(3)).await;
    let shown = notifier.visible().await.expect("second still visible");
    assert_eq!(shown.text, "second");
    assert_eq!(shown.severity, Severity::Error);
    assert_eq!(hidden_count(&drain(&mut rx)), 0);

    tokio::time::sleep(Duration::from_millis(2_001)).await;
    assert!(notifier.visible().await.is_none());
    assert_eq!(hidden_count(&drain(&mut rx)), 1);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(hidden_count(&drain(&mut rx)), 0);
}

#[tokio::test(start_paused = true)]
async fn burst_of_notices_leaves_single_visible_message() {
    let (notifier, mut rx) = notifier();

    for idx in 0..5 {
        notifier.notify(format!("notice {idx}"), Severity::Info).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    assert_eq!(
        notifier.visible().await.map(|notice| notice.text),
        Some("notice 4".to_string())
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    let events = drain(&mut rx);
    let shown = events
        .iter()
        .filter(|event| matches!(event, SessionEvent::NoticeShown(_)))
        .count();
    assert_eq!(shown, 5);
    assert_eq!(hidden_count(&events), 1);
}

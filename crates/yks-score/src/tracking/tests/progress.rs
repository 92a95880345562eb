use super::common::*;
use crate::tracking::progress::summarize;

#[test]
fn progress_is_ordered_by_exam_date_then_name() {
    let (service, _) = build_service();
    let user = user();
    let now = at(2024, 6, 1);
    for (name, taken_on, correct, incorrect) in [
        ("Deneme B", date(2024, 4, 1), 28, 4),
        ("Deneme C", date(2024, 2, 1), 22, 12),
        ("Deneme A", date(2024, 4, 1), 33, 2),
    ] {
        service
            .record_at(&user, submission(turkish(), name, taken_on, correct, incorrect), now)
            .expect("record stored");
    }

    let progress = service.progress_at(&user, now).expect("progress");
    assert_eq!(progress.len(), 1);

    let turkish = &progress[0];
    let names: Vec<&str> = turkish.points.iter().map(|p| p.exam_name.as_str()).collect();
    assert_eq!(names, vec!["Deneme C", "Deneme A", "Deneme B"]);
    assert_eq!(turkish.latest_net, 27.0);
    assert_eq!(turkish.best_net, 32.5);
    assert_eq!(turkish.average_net, (19.0 + 32.5 + 27.0) / 3.0);
    assert_eq!(turkish.label, "TYT Türkçe");
}

#[test]
fn averages_use_clamped_nets() {
    let (service, _) = build_service();
    let user = user();
    let now = at(2024, 6, 1);
    service
        .record_at(&user, submission(mathematics(), "Deneme 1", date(2024, 3, 1), 2, 20), now)
        .expect("record stored");
    service
        .record_at(&user, submission(mathematics(), "Deneme 2", date(2024, 4, 1), 10, 4), now)
        .expect("record stored");

    let progress = service.progress_at(&user, now).expect("progress");
    let mathematics = &progress[0];
    assert_eq!(mathematics.points[0].net, 0.0);
    assert_eq!(mathematics.average_net, 4.5);
}

#[test]
fn subjects_are_grouped_separately() {
    let (service, _) = build_service();
    let user = user();
    let now = at(2024, 6, 1);
    service
        .record_at(&user, submission(mathematics(), "Deneme 1", date(2024, 3, 1), 20, 4), now)
        .expect("record stored");
    service
        .record_at(&user, submission(turkish(), "Deneme 1", date(2024, 3, 1), 30, 0), now)
        .expect("record stored");

    let progress = service.progress_at(&user, now).expect("progress");
    let subjects: Vec<_> = progress.iter().map(|p| p.subject).collect();
    assert_eq!(subjects, vec![turkish(), mathematics()]);
}

#[test]
fn no_records_means_no_series() {
    assert!(summarize(&[]).is_empty());
}

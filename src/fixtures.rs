use crate::models::{ResultRecord, ResultStatus};

pub(crate) fn finisher(
    meet: &str,
    date: &str,
    team: &str,
    athlete: &str,
    place: u32,
    time_seconds: f64,
) -> ResultRecord {
    ResultRecord {
        meet: meet.to_string(),
        date: date.to_string(),
        division: "Varsity".to_string(),
        team: team.to_string(),
        athlete: athlete.to_string(),
        gender: "F".to_string(),
        grade: Some(12),
        place: Some(place),
        time_seconds: Some(time_seconds),
        status: ResultStatus::Finished,
    }
}

/// Three-meet season: a full Hawks squad at Invite A and B, a four-runner
/// Hawks squad at Invite C.
pub(crate) fn season() -> Vec<ResultRecord> {
    let a = |team: &str, athlete: &str, place: u32, time: f64| {
        finisher("Invite A", "2024-09-01", team, athlete, place, time)
    };
    let b = |team: &str, athlete: &str, place: u32, time: f64| {
        finisher("Invite B", "2024-09-15", team, athlete, place, time)
    };
    let c = |team: &str, athlete: &str, place: u32, time: f64| {
        finisher("Invite C", "2024-10-01", team, athlete, place, time)
    };

    let mut dnf = a("XC Hawks", "Rita Zhang", 0, 0.0);
    dnf.place = None;
    dnf.time_seconds = None;
    dnf.status = ResultStatus::Dnf;

    vec![
        a("XC Hawks", "Alice Hart", 1, 360.0),
        a("XC Hawks", "Brooke Lane", 5, 370.0),
        a("XC Hawks", "Casey Reid", 9, 380.0),
        a("XC Hawks", "Dani Shaw", 12, 390.0),
        a("XC Hawks", "Ellie Tran", 15, 400.0),
        a("XC Hawks", "Frankie Wu", 18, 410.0),
        a("XC Hawks", "Greer Young", 21, 420.0),
        dnf,
        a("Speedsters", "Hayley Abbott", 2, 355.0),
        a("Speedsters", "Imani Cole", 4, 365.0),
        a("Speedsters", "Jessa Diaz", 6, 375.0),
        a("Speedsters", "Kira Evans", 8, 385.0),
        a("Speedsters", "Lena Fox", 10, 395.0),
        a("Joggers", "Mina Grey", 3, 400.0),
        a("Joggers", "Nina Hale", 7, 410.0),
        a("Joggers", "Opal Ives", 11, 420.0),
        a("Joggers", "Pia Jones", 14, 430.0),
        a("Joggers", "Quinn Kale", 19, 440.0),
        b("XC Hawks", "Alice Hart", 3, 350.0),
        b("XC Hawks", "Brooke Lane", 7, 360.0),
        b("XC Hawks", "Casey Reid", 11, 370.0),
        b("XC Hawks", "Dani Shaw", 15, 380.0),
        b("XC Hawks", "Ellie Tran", 19, 390.0),
        b("Speedsters", "Hayley Abbott", 1, 345.0),
        b("Speedsters", "Imani Cole", 5, 355.0),
        b("Speedsters", "Jessa Diaz", 9, 365.0),
        b("Speedsters", "Kira Evans", 13, 375.0),
        b("Speedsters", "Lena Fox", 17, 385.0),
        c("XC Hawks", "Alice Hart", 5, 365.0),
        c("XC Hawks", "Brooke Lane", 9, 375.0),
        c("XC Hawks", "Casey Reid", 13, 385.0),
        c("XC Hawks", "Dani Shaw", 17, 395.0),
    ]
}

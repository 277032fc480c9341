use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use almanac_picker::config::PickerOptions;
use almanac_picker::machine::{Period, Picker, PickerView};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("debug"))
        .expect("valid log filter");

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

#[test]
fn full_session_from_toml_options_to_rezoned_emission() {
    init_tracing();

    let options = PickerOptions::from_toml_str(
        r#"
        value = "2024-06-15 09:00"
        timezone = "UTC"
        placeholder = "Pick a moment"
        "#,
    )
    .expect("parse picker options");

    let mut picker = Picker::new(options);
    picker.set_clock(|| {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .expect("valid now")
    });

    let changes: Rc<RefCell<Vec<Option<chrono::DateTime<Tz>>>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    picker.set_on_change(move |value| sink.borrow_mut().push(value));

    picker.open();
    assert_eq!(picker.view(), PickerView::Date);

    let day = picker
        .grid()
        .iter()
        .find(|entry| entry.is_current_month && entry.date.day() == 21)
        .cloned()
        .expect("june grid holds the 21st");
    picker.select_day(&day);

    picker.show_time();
    picker.select_hour(7);
    picker.select_minute(15);
    picker.select_period(Period::Pm);
    picker.commit();

    assert!(!picker.is_open());
    assert_eq!(picker.display_text(), "June 21, 2024 07:15 PM");
    {
        let log = changes.borrow();
        assert_eq!(log.len(), 1);
        let committed = log[0].expect("committed value");
        assert_eq!(committed.day(), 21);
        assert_eq!(committed.hour(), 19);
    }

    picker.set_zone(Some("Asia/Kolkata"));

    let log = changes.borrow();
    assert_eq!(log.len(), 2);
    let rezoned = log[1].expect("rezoned value");
    assert_eq!(rezoned, log[0].expect("committed value"));
    assert_eq!(rezoned.day(), 22);
    assert_eq!(rezoned.hour(), 0);
    assert_eq!(rezoned.minute(), 45);
    assert_eq!(picker.offset_label(), "UTC+5:30");
}

#[test]
fn date_only_picker_renders_without_a_clock() {
    init_tracing();

    let mut picker = Picker::new(PickerOptions {
        timezone: Some("UTC".to_string()),
        need_time_picker: false,
        ..PickerOptions::default()
    });
    picker.set_clock(|| {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .expect("valid now")
    });

    picker.open();
    picker.show_time();
    assert_eq!(picker.view(), PickerView::Date);

    let day = picker
        .grid()
        .iter()
        .find(|entry| entry.is_current_month && entry.date.day() == 3)
        .cloned()
        .expect("june grid holds the 3rd");
    picker.select_day(&day);
    picker.commit();

    assert_eq!(picker.display_text(), "June 3, 2024");
}

use std::rc::Rc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use almanac_core::format;
use almanac_core::grid::{self, Day, GridCache};
use almanac_core::parse::{ParseOptions, ValueInput, parse_value};
use almanac_core::zone;

use crate::config::PickerOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerView {
    Date,
    Time,
    YearMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Am,
    Pm,
}

impl Period {
    pub fn all() -> [Period; 2] {
        [Period::Am, Period::Pm]
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }

    pub fn for_hour(hour: u32) -> Period {
        if hour >= 12 { Period::Pm } else { Period::Am }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonthSelection {
    pub year: i32,
    pub month0: u32,
}

pub struct Picker {
    options: PickerOptions,
    zone: Tz,
    view: PickerView,
    open: bool,
    draft: Option<DateTime<Tz>>,
    committed: Option<DateTime<Tz>>,
    anchor: DateTime<Tz>,
    scoped: Option<YearMonthSelection>,
    grids: GridCache,
    on_change: Option<Rc<dyn Fn(Option<DateTime<Tz>>)>>,
    on_clear: Option<Rc<dyn Fn()>>,
    date_filter: Option<Rc<dyn Fn(&Day) -> bool>>,
    clock: Box<dyn Fn() -> DateTime<Utc>>,
}

impl Picker {
    pub fn new(mut options: PickerOptions) -> Self {
        options.sanitize();
        let zone = zone::resolve_zone(options.timezone.as_deref());
        let clock: Box<dyn Fn() -> DateTime<Utc>> = Box::new(Utc::now);

        let input = options.value.clone().map(ValueInput::Text);
        let parse_opts = ParseOptions {
            zone,
            format: options.format.as_deref(),
            extra_formats: &options.extra_formats,
        };
        let committed = parse_value(input.as_ref(), &parse_opts, clock());
        let anchor = committed.unwrap_or_else(|| clock().with_timezone(&zone));
        let view = if options.time_only {
            PickerView::Time
        } else {
            PickerView::Date
        };

        Self {
            options,
            zone,
            view,
            open: false,
            draft: committed,
            committed,
            anchor,
            scoped: None,
            grids: GridCache::new(),
            on_change: None,
            on_clear: None,
            date_filter: None,
            clock,
        }
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn view(&self) -> PickerView {
        self.view
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> Option<DateTime<Tz>> {
        self.draft
    }

    pub fn committed(&self) -> Option<DateTime<Tz>> {
        self.committed
    }

    pub fn anchor(&self) -> DateTime<Tz> {
        self.anchor
    }

    pub fn scoped_selection(&self) -> Option<YearMonthSelection> {
        self.scoped
    }

    pub fn offset_label(&self) -> String {
        zone::offset_label(self.options.timezone.as_deref())
    }

    pub fn display_text(&self) -> String {
        match self.committed {
            Some(value) => format::format_value(&value, self.display_pattern()),
            None => self.options.placeholder.clone(),
        }
    }

    fn display_pattern(&self) -> &'static str {
        if self.options.time_only {
            format::DISPLAY_TIME_ONLY
        } else if self.options.need_time_picker {
            format::DISPLAY_WITH_TIME
        } else {
            format::DISPLAY_DATE_ONLY
        }
    }

    pub fn set_on_change(&mut self, handler: impl Fn(Option<DateTime<Tz>>) + 'static) {
        self.on_change = Some(Rc::new(handler));
    }

    pub fn set_on_clear(&mut self, handler: impl Fn() + 'static) {
        self.on_clear = Some(Rc::new(handler));
    }

    pub fn set_date_filter(&mut self, filter: impl Fn(&Day) -> bool + 'static) {
        self.date_filter = Some(Rc::new(filter));
    }

    pub fn set_clock(&mut self, clock: impl Fn() -> DateTime<Utc> + 'static) {
        self.clock = Box::new(clock);
    }

    fn now_utc(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn now_zoned(&self) -> DateTime<Tz> {
        self.now_utc().with_timezone(&self.zone)
    }

    fn initial_view(&self) -> PickerView {
        if self.options.time_only {
            PickerView::Time
        } else {
            PickerView::Date
        }
    }

    pub fn toggle_open(&mut self) {
        if self.open {
            self.dismiss();
        } else {
            self.open();
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.view = self.initial_view();
        self.scoped = None;
        self.draft = self.committed;
        self.anchor = self.committed.unwrap_or_else(|| self.now_zoned());
    }

    pub fn dismiss(&mut self) {
        self.open = false;
        self.view = self.initial_view();
        self.scoped = None;
        self.draft = self.committed;
    }

    pub fn show_time(&mut self) {
        if !self.open || self.view != PickerView::Date || !self.options.need_time_picker {
            tracing::debug!(view = ?self.view, "ignoring show-time request");
            return;
        }
        self.view = PickerView::Time;
    }

    pub fn show_date(&mut self) {
        if !self.open || self.view != PickerView::Time || self.options.time_only {
            tracing::debug!(view = ?self.view, "ignoring show-date request");
            return;
        }
        self.view = PickerView::Date;
    }

    pub fn open_year_month(&mut self) {
        if !self.open || self.view != PickerView::Date {
            tracing::debug!(view = ?self.view, "ignoring year-month request");
            return;
        }
        self.scoped = Some(YearMonthSelection {
            year: self.anchor.year(),
            month0: self.anchor.month0(),
        });
        self.view = PickerView::YearMonth;
    }

    pub fn set_scoped_year(&mut self, year: i32) {
        assert!(
            (NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year),
            "year out of range: {year}"
        );
        let Some(scoped) = self.scoped.as_mut() else {
            tracing::debug!("ignoring year selection outside the year-month view");
            return;
        };
        scoped.year = year;
    }

    pub fn set_scoped_month(&mut self, month0: u32) {
        assert!(month0 < 12, "month index out of range: {month0}");
        let Some(scoped) = self.scoped.as_mut() else {
            tracing::debug!("ignoring month selection outside the year-month view");
            return;
        };
        scoped.month0 = month0;
    }

    pub fn confirm_year_month(&mut self) {
        if self.view != PickerView::YearMonth {
            tracing::debug!(view = ?self.view, "ignoring year-month confirm");
            return;
        }
        if let Some(scoped) = self.scoped.take() {
            let date = grid::with_year_month(self.anchor.date_naive(), scoped.year, scoped.month0);
            self.anchor = zone::resolve_wall_clock(self.zone, date.and_time(self.anchor.time()));
        }
        self.view = PickerView::Date;
    }

    pub fn cancel_year_month(&mut self) {
        if self.view != PickerView::YearMonth {
            return;
        }
        self.scoped = None;
        self.view = PickerView::Date;
    }

    pub fn grid(&mut self) -> Rc<[Day]> {
        let anchor = self.anchor;
        self.grids.grid_for(&anchor)
    }

    pub fn next_month(&mut self) {
        self.shift_anchor(1);
    }

    pub fn prev_month(&mut self) {
        self.shift_anchor(-1);
    }

    fn shift_anchor(&mut self, months: i32) {
        if !self.open || self.view != PickerView::Date {
            tracing::debug!(view = ?self.view, "ignoring month paging");
            return;
        }
        let date = grid::shift_months(self.anchor.date_naive(), months);
        self.anchor = zone::resolve_wall_clock(self.zone, date.and_time(self.anchor.time()));
    }

    pub fn select_day(&mut self, day: &Day) {
        if !self.open || self.view == PickerView::YearMonth {
            tracing::debug!(view = ?self.view, "ignoring day selection");
            return;
        }
        if let Some(filter) = &self.date_filter
            && filter(day)
        {
            tracing::debug!(date = %day.date.date_naive(), "selected day is disabled");
            return;
        }
        let time_source = self.draft.unwrap_or_else(|| self.now_zoned());
        let local = day.date.date_naive().and_time(time_source.time());
        self.draft = Some(zone::resolve_wall_clock(self.zone, local));
        if self.options.no_confirm {
            self.commit();
        }
    }

    pub fn select_hour(&mut self, hour: u32) {
        assert!((1..=12).contains(&hour), "hour out of range: {hour}");
        if !self.time_selection_legal() {
            return;
        }
        let base = self.draft.unwrap_or_else(|| self.now_zoned());
        let hour24 = match Period::for_hour(base.hour()) {
            Period::Am => hour % 12,
            Period::Pm => hour % 12 + 12,
        };
        self.set_draft_time(base, base.time().with_hour(hour24));
    }

    pub fn select_minute(&mut self, minute: u32) {
        assert!(minute < 60, "minute out of range: {minute}");
        if !self.time_selection_legal() {
            return;
        }
        let base = self.draft.unwrap_or_else(|| self.now_zoned());
        self.set_draft_time(base, base.time().with_minute(minute));
    }

    pub fn select_period(&mut self, period: Period) {
        if !self.time_selection_legal() {
            return;
        }
        let base = self.draft.unwrap_or_else(|| self.now_zoned());
        let hour24 = match period {
            Period::Am => base.hour() % 12,
            Period::Pm => base.hour() % 12 + 12,
        };
        self.set_draft_time(base, base.time().with_hour(hour24));
    }

    fn time_selection_legal(&self) -> bool {
        if !self.open || self.view != PickerView::Time {
            tracing::debug!(view = ?self.view, "ignoring time selection outside the time view");
            return false;
        }
        true
    }

    fn set_draft_time(&mut self, base: DateTime<Tz>, time: Option<NaiveTime>) {
        let time = time.unwrap_or_else(|| base.time());
        let local = base.date_naive().and_time(time);
        self.draft = Some(zone::resolve_wall_clock(self.zone, local));
    }

    pub fn select_now(&mut self) {
        if !self.open || self.view == PickerView::YearMonth {
            tracing::debug!(view = ?self.view, "ignoring now selection");
            return;
        }
        let now = self.now_zoned();
        self.draft = Some(now);
        self.anchor = now;
        if self.options.no_confirm {
            self.commit();
        }
    }

    pub fn clear(&mut self) {
        if self.open {
            self.draft = None;
            return;
        }
        self.draft = None;
        self.committed = None;
        self.emit_clear();
    }

    #[tracing::instrument(skip(self), fields(zone = %self.zone))]
    pub fn commit(&mut self) {
        let value = self.draft.map(|draft| draft.with_timezone(&self.zone));
        self.committed = value;
        self.emit_change(value);
        self.open = false;
        self.view = self.initial_view();
        self.scoped = None;
    }

    #[tracing::instrument(skip(self), fields(current = %self.zone))]
    pub fn set_zone(&mut self, timezone: Option<&str>) {
        let next = zone::resolve_zone(timezone);
        if next == self.zone {
            return;
        }
        tracing::debug!(next = %next, "switching picker zone");
        self.zone = next;
        self.options.timezone = timezone.map(str::to_string);
        self.grids.clear();
        self.anchor = self.now_zoned();
        self.draft = self.draft.map(|draft| draft.with_timezone(&next));
        if let Some(value) = self.committed {
            let rezoned = value.with_timezone(&next);
            self.committed = Some(rezoned);
            self.emit_change(Some(rezoned));
        }
    }

    pub fn set_value(&mut self, input: Option<ValueInput>) {
        let parse_opts = ParseOptions {
            zone: self.zone,
            format: self.options.format.as_deref(),
            extra_formats: &self.options.extra_formats,
        };
        let parsed = parse_value(input.as_ref(), &parse_opts, self.now_utc());
        self.committed = parsed;
        self.draft = parsed;
        self.anchor = parsed.unwrap_or_else(|| self.now_zoned());
    }

    fn emit_change(&self, value: Option<DateTime<Tz>>) {
        tracing::debug!(has_value = value.is_some(), "notifying change handler");
        if let Some(handler) = &self.on_change {
            handler(value);
        }
    }

    fn emit_clear(&self) {
        tracing::debug!("notifying clear handler");
        if let Some(handler) = &self.on_clear {
            handler();
        }
    }
}

use std::sync::Arc;

use anyhow::{anyhow, Result};
use cursive::{
    align::HAlign,
    event::{EventResult, Key},
    traits::{Nameable as _, Resizable as _},
    view::{Scrollable, View as _},
    views::{
        Dialog, EditView, FixedLayout, Layer, LinearLayout, OnEventView, OnLayoutView, SelectView,
        TextView,
    },
    Cursive, CursiveRunnable, {Rect, Vec2},
};

use cells_picker::{DisplayItem, Notifier, PickOptions, Selector};

const LIST_NAME: &str = "processes";

/// Full screen cursive front-end. Every prompt runs its own event loop.
pub struct TuiPicker {
    version: Option<&'static str>,
}

impl TuiPicker {
    pub fn new(version: Option<&'static str>) -> Self {
        Self { version }
    }

    fn new_ui(&self) -> CursiveRunnable {
        let mut ui = cursive::default();
        ui.add_global_callback('q', Cursive::quit);
        ui.add_global_callback(Key::Esc, Cursive::quit);

        ui.screen_mut().add_transparent_layer(
            OnLayoutView::new(
                FixedLayout::new().child(
                    Rect::from_point(Vec2::zero()),
                    Layer::new(TextView::new(format!(
                        "cells-picker{}",
                        self.version
                            .map(|vers| " v".to_string() + vers)
                            .unwrap_or_default()
                    )))
                    .full_width(),
                ),
                |layout, size| {
                    layout.set_child_position(0, Rect::from_size((0, 0), (size.x, 1)));
                    layout.layout(size);
                },
            )
            .full_screen(),
        );
        ui
    }
}

impl Selector for TuiPicker {
    fn select(&mut self, items: &[DisplayItem], options: &PickOptions) -> Result<Option<usize>> {
        let items = Arc::new(items.to_vec());
        let mut ui = self.new_ui();

        let mut select = SelectView::new().h_align(HAlign::Left);
        select.add_all(visible_entries(&items, "", options));
        let list = common_list_settings(select).with_name(LIST_NAME);

        let filter_items = Arc::clone(&items);
        let filter_options = options.clone();
        let submit_items = Arc::clone(&items);
        let submit_options = options.clone();
        let filter = EditView::new()
            .on_edit(move |ui, text, _cursor| {
                let entries = visible_entries(&filter_items, text, &filter_options);
                ui.call_on_name(LIST_NAME, |list: &mut OnEventView<SelectView<usize>>| {
                    let select = list.get_inner_mut();
                    select.clear();
                    select.add_all(entries);
                });
            })
            // Enter in the filter box picks the top visible entry
            .on_submit(move |ui, text| {
                if let Some(index) = first_visible(&submit_items, text, &submit_options) {
                    ui.set_user_data(Some(index));
                    ui.quit();
                }
            });

        ui.add_layer(
            Dialog::around(
                LinearLayout::vertical()
                    .child(filter.full_width())
                    .child(list.scrollable().min_size((60, 10))),
            )
            .title(options.placeholder.as_str())
            .button("Cancel", Cursive::quit),
        );

        ui.try_run()
            .map_err(|err| anyhow!("Could not start the terminal UI: {err}"))?;

        Ok(ui.take_user_data::<Option<usize>>().flatten())
    }
}

impl Notifier for TuiPicker {
    fn show_error(&mut self, message: &str, modal: bool) {
        if !modal {
            eprintln!("{message}");
            return;
        }

        let mut ui = self.new_ui();
        ui.add_layer(
            Dialog::text(message)
                .title("Error")
                .button("Ok", Cursive::quit),
        );
        if let Err(err) = ui.try_run() {
            log::debug!("falling back to stderr: {err}");
            eprintln!("{message}");
        }
    }
}

/// List rows for the items matching `filter`, tagged with their index in `items`.
fn visible_entries(
    items: &[DisplayItem],
    filter: &str,
    options: &PickOptions,
) -> Vec<(String, usize)> {
    items
        .iter()
        .enumerate()
        .filter(|(_i, item)| {
            item.matches(filter, options.match_on_description, options.match_on_detail)
        })
        .map(|(i, item)| (item.to_string(), i))
        .collect()
}

fn first_visible(items: &[DisplayItem], filter: &str, options: &PickOptions) -> Option<usize> {
    items.iter().position(|item| {
        item.matches(filter, options.match_on_description, options.match_on_detail)
    })
}

pub fn common_list_settings(mut select: SelectView<usize>) -> OnEventView<SelectView<usize>> {
    // Sets the callback for when "Enter" is pressed.
    select.set_on_submit(|cursive: &mut Cursive, index: &usize| {
        cursive.set_user_data(Some(*index));
        cursive.quit();
    });

    // Let's override the `j` and `k` keys for navigation

    OnEventView::new(select)
        .on_pre_event_inner('k', |s, _| {
            let cb = s.select_up(1);
            Some(EventResult::Consumed(Some(cb)))
        })
        .on_pre_event_inner('g', |s, _| {
            let cb = s.select_up(s.len());
            Some(EventResult::Consumed(Some(cb)))
        })
        .on_pre_event_inner('G', |s, _| {
            let cb = s.select_down(s.len());
            Some(EventResult::Consumed(Some(cb)))
        })
        .on_pre_event_inner('j', |s, _| {
            let cb = s.select_down(1);
            Some(EventResult::Consumed(Some(cb)))
        })
        .on_pre_event_inner('d', |s, _| {
            let cb = s.select_down(10);
            Some(EventResult::Consumed(Some(cb)))
        })
        .on_pre_event_inner('u', |s, _| {
            let cb = s.select_up(10);
            Some(EventResult::Consumed(Some(cb)))
        })
}

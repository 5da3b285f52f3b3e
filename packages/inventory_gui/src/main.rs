//! Drives a couple of GUIs against the in-memory host, tick by tick.

#[macro_use]
extern crate tracing;

use inventory_gui::{
    contents::{PaginatingSource, StaticList},
    element::AcceptAll,
    logging::init_logging,
    mem_host::MemHost,
    scheduler::TickScheduler,
    settings::{Settings, SETTINGS_FILE_NAME},
    translate::{RawAction, RawClick},
    *,
};
use std::{
    path::Path,
    sync::Arc,
    thread,
    time::Duration,
};
use anyhow::*;


/// Ticks to let the scheduler settle after each interaction.
const SETTLE_TICKS: u32 = 8;

const TICK: Duration = Duration::from_millis(50);

fn shop_items(count: u16) -> Vec<Arc<dyn Element>> {
    (0..count)
        .map(|i| {
            let display = ItemStack::one(RawItemId(256 + i)).named(format!("Offer #{}", i + 1));
            Arc::new(ActionItem::on_click_viewer(display, move |viewer| {
                info!(%viewer, offer = i + 1, "offer clicked");
            })) as Arc<dyn Element>
        })
        .collect()
}

fn run() -> Result<()> {
    let settings = Settings::read(SETTINGS_FILE_NAME);
    let host = Arc::new(MemHost::new());
    let sched = Arc::new(TickScheduler::new());
    let cx = GuiContext::new(host.clone(), sched.clone()).with_settings(settings);
    let dispatcher = Arc::new(Dispatcher::new(cx.clone()));
    let on_close = Arc::clone(&dispatcher);
    host.set_close_hook(move |viewer| on_close.on_close(viewer));

    let shop = Gui::builder()
        .lifetime(StateLifetime::Session)
        .size(27)
        .contents(PaginatingSource(
            StaticList::new("Shop", shop_items(40)).with_page_number().with_page_count()
        ))
        .listener(|event: &GuiEvent, _: &mut EventResult| {
            if let GuiEvent::Open { viewer, .. } = event {
                info!(%viewer, "shop opened");
            }
        })
        .build(&cx)?;

    let deposit = Gui::builder()
        .lifetime(StateLifetime::shared())
        .size(9)
        .static_contents(StaticContents::new("Deposit box", vec![
            Arc::new(InputSlot::new("deposit", AcceptAll)?.at(4)) as Arc<dyn Element>,
        ]))
        .build(&cx)?;

    let (alice, bob) = (ViewerId(1), ViewerId(2));
    host.add_viewer(alice);
    host.add_viewer(bob);
    host.set_inventory_slot(alice, 0, ItemStack::new(RawItemId(264), 12));

    shop.open(alice)?;
    deposit.open(bob)?;
    settle(&sched);
    info!(title = ?host.visible_title(alice), "alice sees");

    let mut click = RawClick::new(alice, SlotRef::top(26), RawAction::Pickup(Amount::All));
    dispatcher.on_click(&mut click);
    settle(&sched);
    info!(title = ?host.visible_title(alice), "alice turned the page");

    deposit.open(alice)?;
    settle(&sched);
    let mut click = RawClick::new(alice, SlotRef::bottom(0), RawAction::MoveToOtherInventory);
    dispatcher.on_click(&mut click);
    settle(&sched);
    info!(
        alice = ?host.visible_slots(alice).get(4),
        bob = ?host.visible_slots(bob).get(4),
        "deposited",
    );

    host.close_container(alice);
    host.close_container(bob);
    Ok(())
}

fn settle(sched: &TickScheduler) {
    if !sched.run_until_idle(SETTLE_TICKS) {
        warn!("scheduler did not go idle");
    }
    thread::sleep(TICK);
}

fn main() {
    if let Err(e) = init_logging(Some(Path::new("log"))) {
        eprintln!("unable to initialize logging: {:#}", e);
    }
    if let Err(e) = run() {
        error!("{:#}", e);
    }
}

//! Reconciling a page state with what the host shows the viewer.

use crate::{
    host::{ContainerHandle, ContainerInfo, ContainerKind, Host, ViewerId},
    scheduler::Scheduler,
    session::{PageState, Session},
};
use std::sync::Arc;
use anyhow::*;


/// Container size needed to show a page.
///
/// Fixed-size GUIs always use `max_size`. Dynamic GUIs round the highest occupied slot up to a
/// whole row, with an empty page still getting one row.
pub fn required_size(max_size: usize, dynamic: bool, highest_slot: Option<usize>) -> usize {
    if !dynamic {
        return max_size;
    }
    let required = highest_slot.map(|slot| slot + 1).unwrap_or(0);
    if required > max_size {
        return max_size;
    }
    let rows = ((required + ContainerKind::ROW_LEN - 1) / ContainerKind::ROW_LEN).max(1);
    (rows * ContainerKind::ROW_LEN).min(max_size)
}

/// Find the state of the session's page, falling back to the nearest lower page that has one and
/// moving the session there.
pub fn resolve_page(session: &Session) -> Result<Arc<PageState>> {
    let mut page = session.page();
    while page >= 1 {
        if let Some(state) = session.state().page(page) {
            if page != session.page() {
                debug!(from = session.page(), to = page, "falling back to existing gui page");
                session.set_page(page)?;
            }
            return Ok(state);
        }
        page -= 1;
    }
    bail!("gui has no populated page at or below page {}", session.page())
}


/// Makes the host show a session's current page state to a viewer.
#[derive(Debug, Default)]
pub struct Presenter;

impl Presenter {
    /// Show the session's current page to `viewer`, reusing their open container if it already
    /// matches and otherwise creating and opening a new one.
    pub fn update_view(&self, viewer: ViewerId, session: &Arc<Session>) -> Result<()> {
        let gui = session.gui();
        let cx = gui.context();
        let host = &cx.host;
        let state = resolve_page(session)?;
        let size = required_size(gui.max_size(), gui.is_dynamic(), state.highest_slot());

        let open = host.current_container(viewer)
            .and_then(|container| host.container_info(container).map(|info| (container, info)));
        let reusable = open.as_ref()
            .filter(|(_, info)| is_reusable(info, session, size, state.title()))
            .map(|&(container, _)| container);
        let container = match reusable {
            Some(container) => container,
            None => host.create_container(gui.kind(), size, state.title(), Arc::clone(session)),
        };

        for idx in 0..size {
            let content = state.element(idx)
                .and_then(|element| element.render(viewer, session));
            host.set_container_slot(container, idx, content);
        }

        if reusable.is_some() {
            trace!(%viewer, "refreshing reused gui container");
            host.refresh_view(viewer);
            return Ok(());
        }

        match open {
            None => host.open_container(viewer, container),
            Some((_, info)) => {
                if info.session.is_for(gui) {
                    // replacing our own container, so this close is not the viewer leaving
                    let _guard = cx.suppress_close(viewer);
                    host.close_container(viewer);
                } else {
                    host.close_container(viewer);
                }
                debug!(%viewer, size, "replacing open container with new gui container");
                schedule_reopen(Arc::clone(&cx.host), &*cx.scheduler, cx.settings.reopen_delay_ticks, viewer, container);
            }
        }
        Ok(())
    }
}

fn is_reusable(info: &ContainerInfo, session: &Arc<Session>, size: usize, title: &str) -> bool {
    Arc::ptr_eq(&info.session, session)
        && info.size == size
        && info.title == title
}

fn schedule_reopen(
    host: Arc<dyn Host>,
    scheduler: &dyn Scheduler,
    ticks: u32,
    viewer: ViewerId,
    container: ContainerHandle,
) {
    scheduler.run_later(ticks, Box::new(move || {
        // anything opened in the meantime is newer than this container
        match host.current_container(viewer) {
            None => host.open_container(viewer, container),
            Some(current) if current != container => {
                trace!(%viewer, "viewer opened another container before reopen");
            }
            Some(_) => (),
        }
    }));
}


#[test]
fn test_required_size() {
    assert_eq!(required_size(27, false, Some(0)), 27);
    assert_eq!(required_size(54, true, None), 9);
    assert_eq!(required_size(54, true, Some(0)), 9);
    assert_eq!(required_size(54, true, Some(8)), 9);
    assert_eq!(required_size(54, true, Some(9)), 18);
    assert_eq!(required_size(54, true, Some(53)), 54);
    assert_eq!(required_size(54, true, Some(80)), 54);
}

//! Concurrent group loading: a short-lived, fixed-size pool (one thread per
//! active group reader) used by `TableReader::set_window` in
//! [`crate::access::ParallelMode::Concurrent`]. Each group reader owns its
//! own cache, so no locking is needed beyond the join at the end.

use indexmap::IndexMap;

use crate::group::GroupReader;
use crate::schema::GroupName;

/// Runs `group.set_window(start, count)` for every group concurrently, one
/// thread per group, and waits for all of them. A group reader that panics
/// is treated like any other non-fatal load failure: logged, and its window
/// is left as it was before the call.
pub fn set_window_all(
    groups: &mut IndexMap<GroupName, GroupReader>,
    start: u64,
    count: u64,
) {
    std::thread::scope(|scope| {
        let handles: Vec<_> = groups
            .iter_mut()
            .map(|(name, group)| {
                scope.spawn(move || {
                    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        group.set_window(start, count);
                    }));
                    (name, result)
                })
            })
            .collect();

        for handle in handles {
            if let (name, Err(_)) = handle.join().expect("group-loading thread itself panicked") {
                tracing::error!(group = %name, "set_window task failed; window left unloaded for this group");
            }
        }
    });
}

//! Volume entry grammar.
//!
//! A volume entry is either a bare `PATH` (anonymous or named volume managed
//! by the runtime) or a `SOURCE:TARGET[:MODE]` bind mount. The two are told
//! apart only by the presence of a colon, so Windows-style paths with drive
//! letters are classified as bind mounts.

/// Kind of a volume entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    /// Runtime-managed volume, goes into the run config's volume set.
    Anonymous,
    /// Host bind mount, goes into the host config's bind list verbatim.
    Bind,
}

impl VolumeKind {
    pub fn classify(entry: &str) -> Self {
        if entry.contains(':') {
            VolumeKind::Bind
        } else {
            VolumeKind::Anonymous
        }
    }
}

/// Entries without a host mapping, in their original order.
pub fn anonymous<'a>(volumes: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
    volumes
        .iter()
        .filter(|v| VolumeKind::classify(v) == VolumeKind::Anonymous)
}

/// Bind mount entries, in their original order.
pub fn binds<'a>(volumes: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
    volumes
        .iter()
        .filter(|v| VolumeKind::classify(v) == VolumeKind::Bind)
}

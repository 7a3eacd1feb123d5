//! Inbound commands to the application service.
//!
//! One [`AppCommand`] per line received from the host.  Parsing is a table
//! lookup: bare tokens match the whole (trimmed) line, prefixed tokens
//! match up to and including the `:` and hand the rest of the line over as
//! the payload.  The wire grammar is the contract; anything unmatched is
//! [`AppCommand::Unknown`].

/// Lamp control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampCommand {
    GreenOn,
    GreenOff,
    RedOn,
    RedOff,
}

/// Commands that the host can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand<'a> {
    /// Replace the persisted label list with a comma-separated list.
    StoreObjects(&'a str),
    /// Reload the label list from the store.
    LoadObjects,
    /// Report the label list and, during a pass, pass diagnostics.
    ListObjects,
    /// Erase the label list and reset session and pass state.
    ClearObjects,
    /// Begin a pass for this target label.
    SetTarget(&'a str),
    /// Deflect onto the target pile.
    SortTarget(&'a str),
    /// Deflect onto the other pile.
    SortOther(&'a str),
    /// End the pass and run the PASS_COMPLETE handshake.
    PauseSort,
    /// End the session and zero all counters.
    FinishSort,
    Lamp(LampCommand),
    /// Immediate standby.
    Stop,
    /// Anything else; carries the trimmed line.
    Unknown(&'a str),
}

type PayloadCtor = for<'a> fn(&'a str) -> AppCommand<'a>;

/// Tokens followed by a payload.
static PREFIXED: [(&str, PayloadCtor); 4] = [
    ("STORE_OBJECTS:", |p| AppCommand::StoreObjects(p)),
    ("SET_TARGET:", |p| AppCommand::SetTarget(p)),
    ("SORT_TARGET:", |p| AppCommand::SortTarget(p)),
    ("SORT_OTHER:", |p| AppCommand::SortOther(p)),
];

/// Tokens that must match the whole line.
static BARE: [(&str, AppCommand<'static>); 10] = [
    ("LOAD_OBJECTS", AppCommand::LoadObjects),
    ("LIST_OBJECTS", AppCommand::ListObjects),
    ("CLEAR_OBJECTS", AppCommand::ClearObjects),
    ("PAUSE_SORT", AppCommand::PauseSort),
    ("FINISH_SORT", AppCommand::FinishSort),
    ("GREEN_LED_ON", AppCommand::Lamp(LampCommand::GreenOn)),
    ("GREEN_LED_OFF", AppCommand::Lamp(LampCommand::GreenOff)),
    ("RED_LED_ON", AppCommand::Lamp(LampCommand::RedOn)),
    ("RED_LED_OFF", AppCommand::Lamp(LampCommand::RedOff)),
    ("stop", AppCommand::Stop),
];

impl<'a> AppCommand<'a> {
    /// Parse one received line.  Surrounding whitespace is ignored.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();

        if let Some(cmd) = BARE
            .iter()
            .find(|(token, _)| *token == line)
            .map(|(_, cmd)| *cmd)
        {
            return cmd;
        }

        PREFIXED
            .iter()
            .find_map(|(token, ctor)| line.strip_prefix(token).map(ctor))
            .unwrap_or(AppCommand::Unknown(line))
    }
}

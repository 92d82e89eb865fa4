//! Outbound header computation.

use crate::callseq::{CallSequence, CallSequenceEntry, CALL_SEQUENCE_HEADER};
use crate::http::RequestContext;
use crate::identity::AppIdentity;

/// Compute the call sequence to send on an outbound call.
///
/// The inbound chain is de-duplicated first and the current identifier is
/// appended afterwards, so it is always the last entry. The route path of
/// the inbound request is used when present, `caller` otherwise.
pub fn outbound_call_sequence(
    ctx: &RequestContext,
    identity: &AppIdentity,
    caller: &str,
) -> CallSequence {
    let mut sequence = CallSequence::from_header_values(ctx.call_sequence_values());

    let route = match ctx.route_path() {
        Some(path) if !path.is_empty() => path,
        _ => caller,
    };
    sequence.push(CallSequenceEntry::new(identity.name(), route));

    tracing::debug!(
        depth = sequence.len(),
        current = %sequence.last().map(|e| e.as_str()).unwrap_or_default(),
        "Computed outbound call sequence"
    );

    sequence
}

/// Return `headers` with the computed `g-callsec` header appended.
///
/// Caller-supplied headers pass through unchanged, including any
/// `g-callsec` entry, which stays as a separate prior header.
pub fn tag_headers(
    ctx: &RequestContext,
    identity: &AppIdentity,
    caller: &str,
    headers: &[(String, String)],
) -> Vec<(String, String)> {
    let sequence = outbound_call_sequence(ctx, identity, caller);

    let mut tagged = Vec::with_capacity(headers.len() + 1);
    tagged.extend_from_slice(headers);
    tagged.push((CALL_SEQUENCE_HEADER.to_string(), sequence.to_header_value()));
    tagged
}

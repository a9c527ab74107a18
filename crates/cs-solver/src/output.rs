// output.rs — Parsing the solver's ultimatePermission facts.
//
// The external solver answers with facts of the form
//
//   ultimatePermission(Receiver, "type", Giver, _, _, "Role", _,
//                      TotalDelay, [Via1, Via2, ...], _).
//
// one per (receiver, giver, via) route. Parsing is fail-closed: a line
// that looks like an ultimatePermission fact but does not match the
// shape is an error, anything else is ignored as solver chatter.

use std::collections::BTreeMap;

use regex::Regex;

use cs_model::{Address, DiscoveredSnapshot, UltimateOwner, ViaStep};

use crate::error::SolverError;
use crate::facts::parse_solver_id;

/// One parsed route from the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverRoute {
    pub receiver: Address,
    pub permission: String,
    pub giver: Address,
    pub role: String,
    pub total_delay: u64,
    pub via: Vec<Address>,
}

/// Parse every ultimatePermission fact in the solver output, grouped
/// by giver contract in input order.
pub fn parse_output(
    output: &str,
) -> Result<BTreeMap<Address, Vec<SolverRoute>>, SolverError> {
    // Ten argument positions; the don't-care ones accept any atom.
    let pattern = Regex::new(
        r#"(?x)
        ^ultimatePermission\(
            \s*([A-Za-z0-9_]+)\s*,          # receiver
            \s*"([^"]*)"\s*,                # permission type
            \s*([A-Za-z0-9_]+)\s*,          # giver
            \s*[^,]*,\s*[^,]*,              # don't care
            \s*"([^"]*)"\s*,                # role
            \s*[^,]*,                       # don't care
            \s*(\d+)\s*,                    # total delay
            \s*\[([^\]]*)\]\s*,             # via list
            \s*[^)]*                        # don't care
        \)\.?\s*$
    "#,
    )
    .expect("ultimatePermission pattern is valid");

    let mut routes: BTreeMap<Address, Vec<SolverRoute>> = BTreeMap::new();
    for line in output.lines() {
        let line = line.trim();
        if !line.starts_with("ultimatePermission(") {
            continue;
        }
        let captures = pattern
            .captures(line)
            .ok_or_else(|| SolverError::MalformedFact(line.to_string()))?;

        let receiver = parse_solver_id(&captures[1])?;
        let giver = parse_solver_id(&captures[3])?;
        let via = captures[6]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_solver_id)
            .collect::<Result<Vec<_>, _>>()?;
        let total_delay: u64 = captures[5]
            .parse()
            .map_err(|_| SolverError::MalformedFact(line.to_string()))?;

        routes.entry(giver.clone()).or_default().push(SolverRoute {
            receiver,
            permission: captures[2].to_string(),
            giver,
            role: captures[4].to_string(),
            total_delay,
            via,
        });
    }
    Ok(routes)
}

/// Convert a route to an ultimate-owner record, typing each hop from
/// the snapshot. The solver only reports the total delay, so it lands
/// as a single entry in the delays list.
pub fn route_to_owner(route: &SolverRoute, snapshot: &DiscoveredSnapshot) -> UltimateOwner {
    let via = route
        .via
        .iter()
        .map(|address| {
            ViaStep::new(address.clone(), snapshot.address_type_of(address), None)
        })
        .collect();
    let delays = if route.total_delay > 0 {
        vec![route.total_delay]
    } else {
        Vec::new()
    };
    UltimateOwner::new(
        route.receiver.clone(),
        snapshot.address_type_of(&route.receiver),
        via,
        delays,
    )
}

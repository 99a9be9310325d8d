//! Monitor dumps in the agent's console format, for scripting nullable nodes.

use serde_json::json;

/// Render the node-info dump a monitor agent would return.
///
/// Peer ids, like `id`, must be hex. Sections are omitted when empty so the
/// dump exercises the parser's optional-field handling: no `coinbase` section
/// when `coinbase` is `None`, no `getValidators` when `validators` is empty.
pub fn monitor_dump(id: &str, peers: &[&str], coinbase: Option<&str>, validators: &[&str]) -> String {
    let node_info = format!(
        "{{\n  enode: \"enode://{id}@127.0.0.1:21000?discport=0\",\n  id: \"{id}\",\n  name: \"Geth/{id}/v1.8.18-stable/linux-amd64/go1.9.5\"\n}}"
    );

    let peer_blocks: Vec<String> = peers
        .iter()
        .enumerate()
        .map(|(i, peer)| {
            format!(
                "{{\n    caps: [\"istanbul/64\"],\n    id: \"{peer}\",\n    name: \"Geth/{peer}/v1.8.18\",\n    network: {{\n      localAddress: \"127.0.0.1:21000\",\n      remoteAddress: \"10.0.{}.{}:30303\"\n    }},\n    protocols: {{\n      istanbul: {{\n        difficulty: 1,\n        version: 64\n      }}\n    }}\n}}",
                i / 250,
                i % 250 + 1
            )
        })
        .collect();

    let mut dump = json!({
        "nodeInfo": node_info,
        "peers": format!("[{}]", peer_blocks.join(", ")),
        "mining": "true",
        "syncing": false,
    });
    if let Some(coinbase) = coinbase {
        dump["coinbase"] = json!(format!("\"{coinbase}\"\n"));
    }
    if !validators.is_empty() {
        let quoted: Vec<String> = validators.iter().map(|v| format!("\"{v}\"")).collect();
        dump["getValidators"] = json!(format!("[{}]", quoted.join(", ")));
    }
    dump.to_string()
}

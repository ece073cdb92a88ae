// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_enum, required};
use crate::models::{Kind, NewCategory};
use crate::storage::SlotStorage;
use crate::store::FinanceStore;
use crate::utils::pretty_table;
use anyhow::{Result, bail};

pub fn handle<S: SlotStorage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim().to_string();
            let kind: Kind = parse_enum(required(sub, "kind")?)?;
            let id = store.add_category(NewCategory {
                name: name.clone(),
                kind,
            })?;
            println!("Added {} category '{}' (id: {})", kind, name, id);
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let Some(current) = store.category(id) else {
                bail!("Category '{}' not found", id);
            };
            let mut data = NewCategory {
                name: current.name.clone(),
                kind: current.kind,
            };
            if let Some(name) = sub.get_one::<String>("name") {
                data.name = name.trim().to_string();
            }
            if let Some(kind) = sub.get_one::<String>("kind") {
                data.kind = parse_enum(kind)?;
            }
            store.edit_category(id, data)?;
            println!("Updated category {}", id);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            if !store.delete_category(id)? {
                bail!("Category '{}' not found", id);
            }
            println!("Removed category '{}'", id);
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("kind")
                .map(|k| parse_enum::<Kind>(k))
                .transpose()?;
            let data: Vec<Vec<String>> = store
                .categories()
                .iter()
                .filter(|c| kind.is_none_or(|k| c.kind == k))
                .map(|c| vec![c.id.clone(), c.name.clone(), c.kind.to_string()])
                .collect();
            println!("{}", pretty_table(&["Id", "Category", "Kind"], data));
        }
        _ => {}
    }
    Ok(())
}

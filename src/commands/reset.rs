// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::storage::SlotStorage;
use crate::store::FinanceStore;
use anyhow::{Result, bail};

pub fn handle<S: SlotStorage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    if !m.get_flag("yes") {
        bail!("Refusing to delete all data without --yes");
    }
    store.reset_all()?;
    println!(
        "All data cleared; {} default categories restored",
        store.categories().len()
    );
    Ok(())
}

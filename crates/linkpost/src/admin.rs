// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `linkpost admin` command implementation.
//!
//! The out-of-band administrator provisioning path; the running services
//! only ever read the administrator set.

use linkpost_config::LinkpostConfig;
use linkpost_core::{ContentStore, LinkpostError};
use linkpost_storage::SqliteStore;

use crate::AdminAction;

pub async fn run_admin(config: LinkpostConfig, action: AdminAction) -> Result<(), LinkpostError> {
    let store = SqliteStore::open(&config.storage.database_path).await?;

    match action {
        AdminAction::Add {
            user_id,
            display_name,
        } => {
            store.admin_add(user_id, &display_name).await?;
            println!("administrator {user_id} ({display_name}) registered");
        }
        AdminAction::List => {
            let admins = store.admin_list().await?;
            if admins.is_empty() {
                println!("no administrators registered");
            } else {
                for admin in admins {
                    println!(
                        "{}\t{}\tadded {}",
                        admin.user_id, admin.display_name, admin.created_at
                    );
                }
            }
        }
    }

    store.close().await
}

//! # Basic Usage Example
//!
//! Walks through the classic `Ttt` table:
//! - Declaring a model with the `#[model]` macro
//! - Saving instances (always an INSERT)
//! - Selecting with a WHERE clause and hydrating typed instances
//! - Updating and deleting with equality conditions
//!
//! Needs a reachable MySQL server. Connection settings come from the file
//! named by `ROWHAUS_CONFIG` (or `./rowhaus.toml`), for example:
//!
//! ```toml
//! [database]
//! host = "localhost"
//! port = 3306
//! database = "peewee_test"
//! username = "root"
//! password = "xxx"
//! charset = "utf8"
//! autocommit = true
//! ```
//!
//! and a table created with
//! `CREATE TABLE Ttt (count INT NOT NULL DEFAULT 0, num INT NOT NULL DEFAULT 0)`.

use anyhow::Context;
use rowhaus::prelude::*;

#[model]
#[table(name = "Ttt")]
pub struct Ttt {
    pub count: i64,
    pub num: i64,
}

fn main() -> anyhow::Result<()> {
    println!("Rowhaus Basic Usage Example");
    println!("===========================");

    let config = AppConfig::load().context("loading rowhaus configuration")?;
    let mut rowhaus =
        Rowhaus::connect(&config.database).context("connecting to the configured database")?;
    let ttt = rowhaus.register::<Ttt>()?;

    // ----insert----
    let mut row = ttt.create([("count", 8), ("num", 0)])?;
    row.save()?;
    let mut row = ttt.instance();
    row.set_count(7)?.set_num(0)?;
    row.save()?;
    println!("Inserted two rows");

    // ----select----
    for row in ttt
        .select(["count", "num"])?
        .filter([("count", 8)])?
        .execute()?
        .get()?
    {
        println!("{} {}", row.count()?, row.num()?);
    }

    // ----update----
    let update = ttt
        .update([("count", 0), ("num", 9)])?
        .filter([("count", 8), ("num", 0)])?
        .execute()?;
    println!("Updated {} row(s)", update.rows_affected().unwrap_or(0));

    for row in ttt.select_all()?.execute()?.get()? {
        println!("{}", row.count()?);
    }

    // ----delete----
    let delete = ttt.delete().filter([("count", 7)])?.execute()?;
    println!("Deleted {} row(s)", delete.rows_affected().unwrap_or(0));

    rowhaus.close()?;
    Ok(())
}

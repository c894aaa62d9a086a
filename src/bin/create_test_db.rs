//! Creates a database pre-filled with demo data for manual testing.

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use time::macros::datetime;

use washboard_rs::{PasswordHash, initialize_db};

/// Create a SQLite database pre-filled with demo data.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path for the new SQLite database.
    #[arg(long, default_value = "test.db")]
    db_path: String,
}

/// The password every demo account gets.
const DEMO_PASSWORD: &str = "tumpukan-cucian-menggunung";

fn main() {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path).expect("Could not open database");
    initialize_db(&connection).expect("Could not initialize database");

    seed_outlets(&connection);
    seed_users(&connection);
    seed_customers(&connection);
    seed_packages(&connection);
    seed_transactions(&connection);

    println!("Created demo database at {}", args.db_path);
    println!("Log in as admin / kasir / owner with password \"{DEMO_PASSWORD}\"");
}

fn seed_outlets(connection: &Connection) {
    connection
        .execute(
            "INSERT INTO outlet (name, address, phone) VALUES
            ('Outlet Pusat', 'Jl. Sudirman 1, Surabaya', '031-555-0101'),
            ('Outlet Cabang A', 'Jl. Diponegoro 45, Surabaya', '031-555-0202')",
            (),
        )
        .expect("Could not insert outlets");
}

fn seed_users(connection: &Connection) {
    let password_hash =
        PasswordHash::from_raw_password(DEMO_PASSWORD).expect("Could not hash demo password");

    let accounts: [(&str, &str, &str, Option<i64>); 3] = [
        ("admin", "Admin Utama", "admin", None),
        ("kasir", "Budi Santoso", "kasir", Some(1)),
        ("owner", "Ibu Ratna", "owner", None),
    ];

    for (username, full_name, role, outlet_id) in accounts {
        connection
            .execute(
                "INSERT INTO user (username, password, full_name, role, outlet_id)
                VALUES (?1, ?2, ?3, ?4, ?5)",
                (username, password_hash.as_ref(), full_name, role, outlet_id),
            )
            .expect("Could not insert user");
    }
}

fn seed_customers(connection: &Connection) {
    connection
        .execute(
            "INSERT INTO customer (name, phone, email, address, is_member, created_at) VALUES
            ('Siti Aminah', '0812-3456-7890', 'siti@example.com', NULL, 1, '2025-11-02T08:00:00Z'),
            ('Agus Wijaya', '0813-1111-2222', NULL, 'Jl. Pahlawan 3', 0, '2025-12-14T08:00:00Z'),
            ('Dewi Lestari', '0815-9999-8888', NULL, NULL, 1, '2026-01-05T08:00:00Z')",
            (),
        )
        .expect("Could not insert customers");
}

fn seed_packages(connection: &Connection) {
    connection
        .execute(
            "INSERT INTO package (name, kind, price, outlet_id) VALUES
            ('Cuci Kering Kiloan', 'kiloan', 7000, NULL),
            ('Cuci Setrika Kiloan', 'kiloan', 9000, NULL),
            ('Bed Cover', 'bed_cover', 35000, 1),
            ('Selimut', 'selimut', 25000, 2)",
            (),
        )
        .expect("Could not insert packages");
}

fn seed_transactions(connection: &Connection) {
    let transactions: [(OffsetDateTime, Option<i64>, i64, &str, &str); 6] = [
        (datetime!(2026-01-10 09:15 UTC), Some(1), 35000, "completed", "paid"),
        (datetime!(2026-01-10 14:40 UTC), Some(1), 50000, "ready", "unpaid"),
        (datetime!(2026-01-28 11:05 UTC), Some(2), 27000, "completed", "paid"),
        (datetime!(2026-02-01 10:20 UTC), Some(2), 15000, "processing", "partial"),
        (datetime!(2026-02-03 16:55 UTC), None, 63000, "pending", "unpaid"),
        (datetime!(2026-03-15 09:30 UTC), Some(1), 90000, "completed", "paid"),
    ];

    for (index, (date, outlet_id, grand_total, status, payment_status)) in
        transactions.into_iter().enumerate()
    {
        let customer_id = (index % 3) as i64 + 1;

        connection
            .execute(
                "INSERT INTO \"transaction\" (invoice_number, customer_id, outlet_id, kasir_id, \
                transaction_date, status, payment_status, total_amount, discount, tax, grand_total)
                VALUES (?1, ?2, ?3, 2, ?4, ?5, ?6, ?7, 0, 0, ?7)",
                (
                    format!("INV-{}", date.unix_timestamp_nanos()),
                    customer_id,
                    outlet_id,
                    date,
                    status,
                    payment_status,
                    grand_total,
                ),
            )
            .expect("Could not insert transaction");
    }
}

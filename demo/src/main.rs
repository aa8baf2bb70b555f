use mvcc::error::Error;
use mvcc::mvcc::{Database, Isolation};

fn main() {
    println!("Hello, mvcc!");

    run();

    println!("Bye~");
}

fn run() {
    let mut db = Database::new(Isolation::Snapshot);

    let c1 = db.begin(None);
    db.set(c1, "b", "1".to_string());
    db.set(c1, "b", "2".to_string());

    db.set(c1, "e", "5".to_string());
    db.delete(c1, "e").unwrap();

    db.set(c1, "c", "0".to_string());
    db.delete(c1, "c").unwrap();
    db.set(c1, "c", "3".to_string());

    db.set(c1, "a", "1".to_string());

    assert_eq!(db.delete(c1, "f"), Err(Error::NoSuchKey));

    db.commit(c1).unwrap();

    let c2 = db.begin(None);
    for key in ["a", "b", "c", "e"] {
        match db.get(c2, key) {
            Ok(value) => println!("{key} = {value}"),
            Err(Error::NoSuchKey) => println!("{key} is absent"),
            Err(err) => println!("{key}: {err}"),
        }
    }
    db.commit(c2).unwrap();
}

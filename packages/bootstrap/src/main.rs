use acltree_bootstrap::university::{PROFESSOR, STUDENT};
use acltree_bootstrap::{BootstrapError, SeedPlan};
use acltree_core::{SharedTree, TreeConfig, READ, WRITE};

const CS101: &str = "/academics/courses/CS/CS101";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BootstrapError> {
    let tree = SharedTree::new(SeedPlan::university().build(TreeConfig::default())?);
    println!("Directory structure initialized.");

    let draft = format!("{}/syllabus_draft.txt", CS101);
    tree.create_file(&draft)?;
    tree.set_content(&draft, "Week 1: introduction")?;

    for path in ["/", "/academics", CS101, "/users/student123/courses/CS101"] {
        println!("\nContents of '{}':", path);
        for entry in tree.list_directory(path)? {
            println!("{}", entry);
        }
    }

    println!();
    if let Err(e) = tree.create_directory("/academics/courses") {
        println!("Rejected: {}", e);
    }
    if let Err(e) = tree.create_file("/nonexistent/file.txt") {
        println!("Rejected: {}", e);
    }
    if let Err(e) = tree.list_directory("/academics/nonexistent") {
        println!("Rejected: {}", e);
    }

    println!("\nFile system tree:\n{}", tree.render());

    println!("Searching for 'syllabus' in /academics:");
    for hit in tree.search_strings("syllabus", "/academics") {
        println!("{}", hit);
    }

    let checks = [
        (STUDENT, CS101, READ),
        (PROFESSOR, CS101, WRITE),
        (STUDENT, CS101, WRITE),
        ("visitor", "/shared/public_documents", READ),
    ];
    println!();
    for (principal, path, capability) in checks {
        println!(
            "{} may {} {}: {}",
            principal,
            capability,
            path,
            tree.check_permission(principal, path, capability)
        );
    }

    Ok(())
}

//! The university seed: departments, courses, research groups, user homes
//! and their default grants.

use acltree_core::{tree_path, TreePath, READ, WRITE};

use crate::plan::SeedPlan;

/// Principal whose grants apply to everyone under the default configuration.
pub const EVERYONE: &str = "all";

pub const STUDENT: &str = "student123";
pub const PROFESSOR: &str = "prof_smith";

impl SeedPlan {
    /// The organisation tree of a small university.
    ///
    /// - users get `read` and `write` on their home directory and on its
    ///   `courses` (students) or `lectures` (faculty) subdirectory
    /// - the professor gets `read` and `write` on the CS courses they teach
    /// - everyone may `read` `/shared/public_documents`
    pub fn university() -> Self {
        let root = TreePath::root();
        let academics = tree_path!("/academics");
        let courses = tree_path!("/academics/courses");
        let cs = tree_path!("/academics/courses/CS");
        let research = tree_path!("/research");
        let projects = tree_path!("/research/projects");
        let ai_lab = tree_path!("/research/projects/AI_Lab");
        let admin = tree_path!("/admin");
        let users = tree_path!("/users");
        let student_home = tree_path!("/users/student123");
        let student_courses = tree_path!("/users/student123/courses");
        let professor_home = tree_path!("/users/prof_smith");
        let shared = tree_path!("/shared");

        let read_write: &[&str] = &[READ, WRITE];

        SeedPlan::new()
            .directory(root.clone(), "academics")
            .directory(root.clone(), "research")
            .directory(root.clone(), "admin")
            .directory(root.clone(), "users")
            .directory(root, "shared")
            .directory(academics.clone(), "courses")
            .directory(academics.clone(), "student_records")
            .directory(academics, "faculty_resources")
            .directory(courses.clone(), "CS")
            .directory(courses, "EE")
            .directory(cs.clone(), "CS101")
            .directory(cs, "CS201")
            .directory(research, "projects")
            .directory(projects, "AI_Lab")
            .directory(ai_lab, "ProjectAlpha")
            .directory(admin.clone(), "finance")
            .directory(admin.clone(), "hr")
            .directory(admin, "registrar")
            .directory(users.clone(), STUDENT)
            .directory(users, PROFESSOR)
            .directory(student_home.clone(), "courses")
            .directory(student_courses.clone(), "CS101")
            .directory(professor_home.clone(), "lectures")
            .directory(shared.clone(), "announcements")
            .directory(shared, "public_documents")
            .file(tree_path!("/academics/courses/CS/CS101"), "syllabus_fall2024.pdf")
            .file(tree_path!("/academics/courses/CS/CS201"), "lectures_week1.pptx")
            .file(tree_path!("/users/student123/courses/CS101"), "assignment1.docx")
            .content(
                tree_path!("/users/student123/courses/CS101/assignment1.docx"),
                "This is the first assignment.",
            )
            .grant(student_home, STUDENT, read_write)
            .grant(student_courses, STUDENT, read_write)
            .grant(professor_home, PROFESSOR, read_write)
            .grant(tree_path!("/users/prof_smith/lectures"), PROFESSOR, read_write)
            .grant(tree_path!("/academics/courses/CS/CS101"), PROFESSOR, read_write)
            .grant(tree_path!("/academics/courses/CS/CS201"), PROFESSOR, read_write)
            .grant(tree_path!("/shared/public_documents"), EVERYONE, &[READ])
    }
}

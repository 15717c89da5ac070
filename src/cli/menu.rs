use std::io::{BufRead, Write};
use std::path::Path;

use tracing::debug;

use super::display::{contact_card, listing_row, or_dash};
use super::prompt::{BACK, Prompt, is_end_of_input};
use crate::domain::contact::{ValidationReq, email_is_plausible, phone_is_plausible, validate_name};
use crate::domain::{Contact, ContactBook, ContactPatch, Field, Selector};
use crate::errors::AppError;

/// One state per menu screen. Every screen except `Main` returns to `Main`
/// when it finishes, whether or not its operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Add,
    View,
    Show,
    Search,
    Update,
    Delete,
    Import,
    Export,
    Exit,
}

const MENU: [(&str, &str, Screen); 9] = [
    ("1", "Add contact", Screen::Add),
    ("2", "View contacts", Screen::View),
    ("3", "Show contact", Screen::Show),
    ("4", "Search contacts", Screen::Search),
    ("5", "Update contact", Screen::Update),
    ("6", "Delete contact", Screen::Delete),
    ("7", "Import contacts", Screen::Import),
    ("8", "Export contacts", Screen::Export),
    ("0", "Exit", Screen::Exit),
];

impl Screen {
    /// Accepts the menu number or the command name.
    pub fn from_choice(choice: &str) -> Result<Screen, AppError> {
        let choice = choice.trim().to_lowercase();
        let screen = match choice.as_str() {
            "add" => Screen::Add,
            "view" | "list" => Screen::View,
            "show" => Screen::Show,
            "search" => Screen::Search,
            "update" | "edit" => Screen::Update,
            "delete" => Screen::Delete,
            "import" => Screen::Import,
            "export" => Screen::Export,
            "exit" | "quit" | "q" => Screen::Exit,
            number => MENU
                .iter()
                .find(|(key, _, _)| *key == number)
                .map(|(_, _, screen)| *screen)
                .ok_or(AppError::ParseCommand(choice.clone()))?,
        };
        Ok(screen)
    }
}

pub struct Menu<'a, R, W> {
    book: &'a mut ContactBook,
    prompt: Prompt<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(book: &'a mut ContactBook, input: R, output: W) -> Self {
        Self {
            book,
            prompt: Prompt::new(input, output),
        }
    }

    /// Runs until the user exits or input ends, then saves anything a
    /// failed save left behind.
    pub fn run(&mut self) -> Result<(), AppError> {
        let mut screen = Screen::Main;

        loop {
            debug!(?screen, "menu transition");
            screen = match screen {
                Screen::Exit => break,
                Screen::Main => match self.main_screen() {
                    Ok(next) => next,
                    Err(e) if is_end_of_input(&e) => Screen::Exit,
                    Err(e) => return Err(e),
                },
                other => match self.run_screen(other) {
                    Ok(()) => Screen::Main,
                    Err(e) if is_end_of_input(&e) => Screen::Exit,
                    Err(e) => {
                        self.report(&e)?;
                        Screen::Main
                    }
                },
            };
        }

        self.book.flush()?;
        self.prompt.say("Goodbye!")?;
        Ok(())
    }

    fn main_screen(&mut self) -> Result<Screen, AppError> {
        self.prompt.blank()?;
        self.prompt.say("=== Contact Book ===")?;
        for (key, label, _) in MENU {
            self.prompt.say(format!("{key}. {label}"))?;
        }

        let Some(choice) = self.prompt.ask("Choose an option")? else {
            return Ok(Screen::Main);
        };

        match Screen::from_choice(&choice) {
            Ok(screen) => Ok(screen),
            Err(e) => {
                self.prompt.say(e)?;
                Ok(Screen::Main)
            }
        }
    }

    fn run_screen(&mut self, screen: Screen) -> Result<(), AppError> {
        self.prompt.blank()?;
        match screen {
            Screen::Add => self.add_screen(),
            Screen::View => self.view_screen(),
            Screen::Show => self.show_screen(),
            Screen::Search => self.search_screen(),
            Screen::Update => self.update_screen(),
            Screen::Delete => self.delete_screen(),
            Screen::Import => self.import_screen(),
            Screen::Export => self.export_screen(),
            Screen::Main | Screen::Exit => Ok(()),
        }
    }

    fn report(&mut self, err: &AppError) -> Result<(), AppError> {
        self.prompt.say(format!("Error: {err}"))?;
        if self.book.is_dirty() {
            self.prompt
                .say("Changes are kept in memory and will be saved on the next change or on exit.")?;
        }
        Ok(())
    }

    fn add_screen(&mut self) -> Result<(), AppError> {
        self.prompt
            .say(format!("--- Add Contact --- ({BACK} to go back)"))?;

        let Some(name) = self.prompt.retry("Name", validate_name)? else {
            return Ok(());
        };

        let Some(phone) = self.prompt.ask("Phone (optional)")? else {
            return Ok(());
        };
        if !phone_is_plausible(&phone)?
            && !self.keep_anyway(&ValidationReq::phone_req(), "phone number", &phone)?
        {
            return self.prompt.say("Cancelled add.");
        }

        let Some(email) = self.prompt.ask("Email (optional)")? else {
            return Ok(());
        };
        if !email_is_plausible(&email)?
            && !self.keep_anyway(&ValidationReq::email_req(), "email", &email)?
        {
            return self.prompt.say("Cancelled add.");
        }

        let Some(address) = self.prompt.ask("Address (optional)")? else {
            return Ok(());
        };
        let Some(notes) = self.prompt.ask("Notes (optional)")? else {
            return Ok(());
        };

        let contact = Contact::new(name, phone, email)
            .with_address(address)
            .with_notes(notes);
        let name = contact.name.clone();
        let position = self.book.add(contact)?;

        self.prompt
            .say(format!("Contact '{name}' added at position {position}."))
    }

    fn keep_anyway(&mut self, requirement: &str, what: &str, value: &str) -> Result<bool, AppError> {
        self.prompt.say(requirement)?;
        self.prompt
            .confirm_action(&format!("keep {what} '{value}' anyway"))
    }

    fn view_screen(&mut self) -> Result<(), AppError> {
        if self.book.is_empty() {
            return self.prompt.say("No contacts found.");
        }

        self.prompt.say("--- All Contacts ---")?;
        for (position, contact) in self.book.sorted_by(Field::Name, false) {
            self.prompt.say(listing_row(position, contact))?;
        }
        Ok(())
    }

    fn select(&mut self, action: &str) -> Result<Option<Selector>, AppError> {
        let label = format!("Position, name, or phone:/email: value of the contact to {action}");
        let Some(input) = self.prompt.ask(&label)? else {
            return Ok(None);
        };
        Ok(Some(input.parse()?))
    }

    fn show_screen(&mut self) -> Result<(), AppError> {
        let Some(selector) = self.select("show")? else {
            return Ok(());
        };

        let (position, contact) = self.book.get(&selector)?;
        let card = contact_card(position, contact);
        self.prompt.say(card)
    }

    fn search_screen(&mut self) -> Result<(), AppError> {
        let Some(query) = self.prompt.ask("Search name / phone / email")? else {
            return Ok(());
        };
        if query.is_empty() {
            return self.prompt.say("Empty search.");
        }

        let rows: Vec<String> = self
            .book
            .search(&query)
            .into_iter()
            .map(|(position, contact)| listing_row(position, contact))
            .collect();

        if rows.is_empty() {
            return self.prompt.say("No matching contacts.");
        }

        self.prompt.say(format!("Found {} result(s):", rows.len()))?;
        for row in rows {
            self.prompt.say(row)?;
        }
        Ok(())
    }

    fn update_screen(&mut self) -> Result<(), AppError> {
        let Some(selector) = self.select("update")? else {
            return Ok(());
        };
        let (position, current) = self.book.get(&selector)?;
        let current = current.clone();

        self.prompt.say(contact_card(position, &current))?;
        self.prompt
            .say("Press Enter to keep the current value, '-' to clear an optional field.")?;

        let mut patch = ContactPatch::default();
        for field in [Field::Name, Field::Phone, Field::Email, Field::Address, Field::Notes] {
            let label = format!("{} [{}]", capitalized(field), or_dash(current.field(field)));
            let Some(reply) = self.prompt.ask(&label)? else {
                return Ok(());
            };

            if let Some(value) = self.accept_update(field, reply)? {
                patch.set(field, value);
            }
        }

        if patch.is_empty() {
            return self.prompt.say("Nothing changed.");
        }

        self.book.update(&Selector::Position(position), &patch)?;
        self.prompt.say("Contact updated.")
    }

    /// Turns a reply into the new value for `field`, or `None` to keep the
    /// current one.
    fn accept_update(&mut self, field: Field, reply: String) -> Result<Option<String>, AppError> {
        if reply.is_empty() {
            return Ok(None);
        }

        if reply == "-" {
            if field == Field::Name {
                self.prompt
                    .say("Name cannot be empty. Keeping current name.")?;
                return Ok(None);
            }
            return Ok(Some(String::new()));
        }

        let plausible = match field {
            Field::Phone => phone_is_plausible(&reply)?,
            Field::Email => email_is_plausible(&reply)?,
            _ => true,
        };
        if !plausible {
            self.prompt
                .say(format!("Invalid {field} format. Keeping old {field}."))?;
            return Ok(None);
        }

        Ok(Some(reply))
    }

    fn delete_screen(&mut self) -> Result<(), AppError> {
        let Some(selector) = self.select("delete")? else {
            return Ok(());
        };
        let (position, contact) = self.book.get(&selector)?;
        let card = contact_card(position, contact);
        let name = contact.name.clone();

        self.prompt.say(card)?;
        if !self.prompt.confirm_action(&format!("delete '{name}'"))? {
            return self.prompt.say("Cancelled.");
        }

        self.book.delete(&Selector::Position(position))?;
        self.prompt.say("Deleted.")
    }

    fn import_screen(&mut self) -> Result<(), AppError> {
        let Some(path) = self.prompt.ask("Path of the .json or .csv file to import")? else {
            return Ok(());
        };
        if path.is_empty() {
            return self.prompt.say("No path given.");
        }

        let count = self.book.import_from(Path::new(&path))?;
        self.prompt
            .say(format!("Imported {count} contacts from {path}."))
    }

    fn export_screen(&mut self) -> Result<(), AppError> {
        let Some(path) = self
            .prompt
            .ask("File path to export contacts to (e.g. export.json or export.csv)")?
        else {
            return Ok(());
        };
        if path.is_empty() {
            return self.prompt.say("No path given.");
        }

        let count = self.book.export_to(Path::new(&path))?;
        self.prompt
            .say(format!("Exported {count} contacts to {path}."))
    }
}

fn capitalized(field: Field) -> &'static str {
    match field {
        Field::Name => "Name",
        Field::Phone => "Phone",
        Field::Email => "Email",
        Field::Address => "Address",
        Field::Notes => "Notes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStore;
    use std::io::Cursor;

    fn run_menu(contacts: Vec<Contact>, script: &str) -> Result<(String, MemStore), AppError> {
        let store = MemStore::with_contacts(contacts);
        let mut book = ContactBook::open(Box::new(store.clone()))?;
        let mut output = Vec::new();

        Menu::new(&mut book, Cursor::new(script.as_bytes().to_vec()), &mut output).run()?;

        Ok((String::from_utf8_lossy(&output).to_string(), store))
    }

    #[test]
    fn choices_map_to_screens() -> Result<(), AppError> {
        assert_eq!(Screen::from_choice("1")?, Screen::Add);
        assert_eq!(Screen::from_choice(" Search ")?, Screen::Search);
        assert_eq!(Screen::from_choice("0")?, Screen::Exit);
        assert!(matches!(
            Screen::from_choice("9"),
            Err(AppError::ParseCommand(_))
        ));
        Ok(())
    }

    #[test]
    fn add_reprompts_for_empty_name() -> Result<(), AppError> {
        let (output, store) = run_menu(Vec::new(), "1\n\nAlice\n1234567\n\n\n\n0\n")?;

        assert!(output.contains("Validation failed: Name cannot be empty"));
        assert!(output.contains("Contact 'Alice' added at position 1."));
        assert_eq!(store.snapshot(), vec![Contact::new("Alice", "1234567", "")]);
        Ok(())
    }

    #[test]
    fn implausible_phone_can_be_declined() -> Result<(), AppError> {
        let (output, store) = run_menu(Vec::new(), "add\nAlice\n12ab\nn\nexit\n")?;

        assert!(output.contains("Cancelled add."));
        assert!(store.snapshot().is_empty());

        let (_, store) = run_menu(Vec::new(), "add\nAlice\n12ab\ny\n\n\n\nexit\n")?;
        assert_eq!(store.snapshot(), vec![Contact::new("Alice", "12ab", "")]);
        Ok(())
    }

    #[test]
    fn back_returns_to_main_menu() -> Result<(), AppError> {
        let (output, store) = run_menu(Vec::new(), "1\nAlice\n*\n0\n")?;

        assert_eq!(output.matches("=== Contact Book ===").count(), 2);
        assert!(store.snapshot().is_empty());
        Ok(())
    }

    #[test]
    fn view_and_search_list_positions() -> Result<(), AppError> {
        let contacts = vec![
            Contact::new("Alice", "123", ""),
            Contact::new("Bob", "555", "Bob@Example.com"),
        ];
        let (output, _) = run_menu(contacts.clone(), "2\n4\nbob@example\n4\n\n0\n")?;

        assert!(output.contains(&listing_row(1, &contacts[0])));
        assert!(output.contains("Found 1 result(s):"));
        assert_eq!(output.matches(&listing_row(2, &contacts[1])).count(), 2);
        assert!(output.contains("Empty search."));
        Ok(())
    }

    #[test]
    fn view_lists_by_name_with_storage_positions() -> Result<(), AppError> {
        let contacts = vec![
            Contact::new("zed", "1234567", ""),
            Contact::new("Amy", "7654321", ""),
        ];
        let (output, _) = run_menu(contacts.clone(), "2\n0\n")?;

        let amy = output.find(&listing_row(2, &contacts[1]));
        let zed = output.find(&listing_row(1, &contacts[0]));
        assert!(amy.is_some() && zed.is_some());
        assert!(amy < zed);
        Ok(())
    }

    #[test]
    fn update_keeps_blank_fields_and_clears_dash() -> Result<(), AppError> {
        let original = Contact::new("Alice", "123", "alice@example.com").with_notes("friend");
        let script = "5\nAlice\n\n4567890\n\n1 Main St\n-\n0\n";

        let (output, store) = run_menu(vec![original], script)?;

        assert!(output.contains("Contact updated."));
        assert_eq!(
            store.snapshot(),
            vec![Contact::new("Alice", "4567890", "alice@example.com").with_address("1 Main St")]
        );
        Ok(())
    }

    #[test]
    fn update_rejects_implausible_email() -> Result<(), AppError> {
        let script = "5\n1\n\n\nnot-an-email\n\n\n0\n";

        let (output, store) = run_menu(vec![Contact::new("Alice", "123", "a@b.co")], script)?;

        assert!(output.contains("Invalid email format. Keeping old email."));
        assert!(output.contains("Nothing changed."));
        assert_eq!(store.save_count(), 0);
        Ok(())
    }

    #[test]
    fn delete_asks_for_confirmation() -> Result<(), AppError> {
        let contacts = vec![Contact::new("Alice", "1", ""), Contact::new("Bob", "2", "")];

        let (output, store) = run_menu(contacts.clone(), "6\nBob\nn\n0\n")?;
        assert!(output.contains("Cancelled."));
        assert_eq!(store.save_count(), 0);

        let (output, store) = run_menu(contacts, "6\nphone:2\ny\n0\n")?;
        assert!(output.contains("Deleted."));
        assert_eq!(store.snapshot(), vec![Contact::new("Alice", "1", "")]);
        Ok(())
    }

    #[test]
    fn errors_are_reported_and_menu_continues() -> Result<(), AppError> {
        let (output, _) = run_menu(vec![Contact::new("Alice", "1", "")], "6\n4\n3\nGhost\n9\n0\n")?;

        assert!(output.contains("Error: Contact at position 4 Not found"));
        assert!(output.contains("Error: Contact with name 'Ghost' Not found"));
        assert!(output.contains("Unrecognized command: '9'"));
        assert!(output.ends_with("Goodbye!\n"));
        Ok(())
    }

    #[test]
    fn end_of_input_exits_cleanly() -> Result<(), AppError> {
        let (output, _) = run_menu(Vec::new(), "1\nAli")?;

        assert!(output.ends_with("Goodbye!\n"));
        Ok(())
    }
}

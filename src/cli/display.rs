use crate::domain::Contact;

pub(crate) fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// One line of the contact list.
pub fn listing_row(position: usize, contact: &Contact) -> String {
    format!(
        "{position:>3}. {:<20} {:<15} {:<30}",
        contact.name,
        or_dash(&contact.phone),
        or_dash(&contact.email)
    )
    .trim_end()
    .to_string()
}

/// Every field of one contact.
pub fn contact_card(position: usize, contact: &Contact) -> String {
    format!(
        "Position: {position}\n\
        Name:     {}\n\
        Phone:    {}\n\
        Email:    {}\n\
        Address:  {}\n\
        Notes:    {}",
        contact.name,
        or_dash(&contact.phone),
        or_dash(&contact.email),
        or_dash(&contact.address),
        or_dash(&contact.notes)
    )
}

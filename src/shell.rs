//! Shell
//!
//! Line-oriented front end over a [`Store`]. Each input line is one user event; the
//! store finishes handling it (mutation, total and notifications) before the next line
//! is read.

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use thiserror::Error;
use tracing::warn;

use crate::{
    catalog::Catalog,
    notifications::{LogSink, Notification},
    products::Product,
    receipt::ReceiptError,
    store::Store,
};

/// Notifications are logged and also kept so the shell can echo them.
pub type ShellSink = (LogSink, Vec<Notification>);

const COMMANDS: &str = "\
Commands:
  categories          list categories
  category <name>     list the products of a category
  products            list every product
  search <text>       find products by name
  promotions          show the current offers
  add <product>       add one unit to the cart
  promo               add one bundle of the promoted product
  remove <product>    take one unit off the cart
  inc <product>       add one unit to a cart line
  dec <product>       take one unit off a cart line
  drop <product>      remove a whole cart line
  clear               empty the cart
  cart                show the cart
  pay                 proceed to payment
  help                show this message
  exit                leave the store";

/// Errors that stop the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The receipt could not be written.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Errors parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The command word is not recognised.
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// The command needs an argument.
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
}

/// One user event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List categories
    Categories,
    /// List one category
    Category(String),
    /// List every product
    Products,
    /// Search products by name
    Search(String),
    /// Show promotions
    Promotions,
    /// Add a product from the catalog
    Add(String),
    /// Add one bundle of the promoted product
    Promo,
    /// Take one unit off from the catalog screen
    Remove(String),
    /// Add one unit to a cart line
    Increase(String),
    /// Take one unit off a cart line
    Decrease(String),
    /// Remove a whole cart line
    Drop(String),
    /// Empty the cart
    Clear,
    /// Show the cart
    Cart,
    /// Proceed to payment
    Pay,
    /// Show help
    Help,
    /// Leave
    Exit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "categories" => Ok(Command::Categories),
            "category" => argument("category").map(Command::Category),
            "products" | "list" => Ok(Command::Products),
            "search" => argument("search").map(Command::Search),
            "promotions" | "offers" => Ok(Command::Promotions),
            "add" => argument("add").map(Command::Add),
            "promo" => Ok(Command::Promo),
            "remove" => argument("remove").map(Command::Remove),
            "inc" => argument("inc").map(Command::Increase),
            "dec" => argument("dec").map(Command::Decrease),
            "drop" => argument("drop").map(Command::Drop),
            "clear" => Ok(Command::Clear),
            "cart" => Ok(Command::Cart),
            "pay" => Ok(Command::Pay),
            "help" => Ok(Command::Help),
            "exit" | "quit" => Ok(Command::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Exit,
}

/// Storefront shell
#[derive(Debug)]
pub struct Shell<'a> {
    store: Store<'a, ShellSink>,
    support_contact: String,
}

impl<'a> Shell<'a> {
    /// Create a shell over a fresh store.
    pub fn new(
        catalog: Catalog<'a>,
        payment_url: impl Into<String>,
        support_contact: impl Into<String>,
    ) -> Self {
        Self {
            store: Store::new(catalog, (LogSink, Vec::new())).with_payment_url(payment_url),
            support_contact: support_contact.into(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Store<'a, ShellSink> {
        &self.store
    }

    /// Handle lines from `input` until it ends or the user exits.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if input cannot be read or output cannot be written.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<(), ShellError> {
        writeln!(out, "Welcome! Type `help` to see what you can do.")?;

        for line in input.lines() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let flow = match line.parse::<Command>() {
                Ok(command) => self.handle(command, &mut out)?,
                Err(err) => {
                    warn!(%err, "rejected command");
                    writeln!(out, "{err}. Type `help` for a list of commands.")?;
                    Flow::Continue
                }
            };

            out.flush()?;

            if flow == Flow::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Handle a single command.
    ///
    /// Store errors such as unknown products are reported to the user and do not stop the
    /// shell.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if output cannot be written.
    pub fn handle(&mut self, command: Command, out: &mut impl Write) -> Result<Flow, ShellError> {
        let result = match command {
            Command::Categories => {
                for category in self.store.catalog().categories() {
                    writeln!(out, "{} ({})", category.name(), category.len())?;
                }
                return Ok(Flow::Continue);
            }
            Command::Category(name) => match self.store.catalog().category(&name) {
                Ok(products) => {
                    write_products(out, &products)?;
                    return Ok(Flow::Continue);
                }
                Err(err) => Err(err.into()),
            },
            Command::Products => {
                let products: Vec<_> = self.store.catalog().products().collect();
                write_products(out, &products)?;
                return Ok(Flow::Continue);
            }
            Command::Search(query) => {
                let products = self.store.catalog().search(&query);

                if products.is_empty() {
                    writeln!(out, "Nothing matches \"{query}\".")?;
                } else {
                    write_products(out, &products)?;
                }
                return Ok(Flow::Continue);
            }
            Command::Promotions => {
                self.write_promotions(out)?;
                return Ok(Flow::Continue);
            }
            Command::Add(name) => self.store.add_to_cart(&name, false),
            Command::Promo => match self.store.catalog().promotion() {
                Some(promotion) => {
                    let name = promotion.product().to_string();
                    self.store.add_to_cart(&name, true)
                }
                None => {
                    writeln!(out, "There is no promotion running.")?;
                    return Ok(Flow::Continue);
                }
            },
            Command::Remove(name) => self.store.remove_from_cart(&name),
            Command::Increase(name) => self.store.increase_quantity(&name),
            Command::Decrease(name) => self.store.decrease_quantity(&name),
            Command::Drop(name) => self.store.remove_line(&name),
            Command::Clear => self.store.clear_cart(),
            Command::Cart => {
                match self.store.receipt() {
                    Ok(receipt) => receipt.write_to(&mut *out)?,
                    Err(err) => writeln!(out, "{err}")?,
                }
                return Ok(Flow::Continue);
            }
            Command::Pay => {
                match self.store.checkout() {
                    Ok(_) => self.flush_notifications(out)?,
                    Err(err) => writeln!(out, "{err}")?,
                }
                return Ok(Flow::Continue);
            }
            Command::Help => {
                writeln!(
                    out,
                    "If you have any questions, contact us at {}.\n\n{COMMANDS}",
                    self.support_contact
                )?;
                return Ok(Flow::Continue);
            }
            Command::Exit => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
        };

        match result {
            Ok(total) => {
                self.flush_notifications(out)?;
                writeln!(out, "Total: {total}")?;
            }
            Err(err) => {
                warn!(%err, "command failed");
                writeln!(out, "{err}")?;
            }
        }

        Ok(Flow::Continue)
    }

    fn flush_notifications(&mut self, out: &mut impl Write) -> Result<(), ShellError> {
        for notification in self.store.sink_mut().1.drain(..) {
            writeln!(out, "{notification}")?;
        }

        Ok(())
    }

    fn write_promotions(&self, out: &mut impl Write) -> Result<(), ShellError> {
        let catalog = self.store.catalog();

        let standalone = catalog.standalone();

        if !standalone.is_empty() {
            writeln!(out, "Special offers:")?;
            write_products(out, &standalone)?;
        }

        if let Some(promotion) = catalog.promotion() {
            let terms = promotion.terms();

            writeln!(
                out,
                "Bundle: {} {} for {} (use `promo`)",
                terms.size(),
                promotion.product(),
                terms.price()
            )?;
        }

        Ok(())
    }
}

fn write_products(out: &mut impl Write, products: &[&Product<'_>]) -> Result<(), ShellError> {
    for product in products {
        writeln!(
            out,
            "{} - {} | {}",
            product.name, product.unit_label, product.price
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::fixtures::default_catalog;

    use super::*;

    fn run_script(script: &str) -> TestResult<(Shell<'static>, String)> {
        let mut shell = Shell::new(
            default_catalog()?,
            "https://example.com/payment",
            "help@example.com",
        );
        let mut out = Vec::new();

        shell.run(script.as_bytes(), &mut out)?;

        Ok((shell, String::from_utf8(out)?))
    }

    #[test]
    fn parses_commands_with_multi_word_arguments() {
        assert_eq!(
            "category Fruit & Vegetables".parse::<Command>(),
            Ok(Command::Category("Fruit & Vegetables".to_string()))
        );
        assert_eq!(
            "  ADD   Apples ".parse::<Command>(),
            Ok(Command::Add("Apples".to_string()))
        );
        assert_eq!("quit".parse::<Command>(), Ok(Command::Exit));
    }

    #[test]
    fn rejects_unknown_commands_and_missing_arguments() {
        assert_eq!(
            "buy Apples".parse::<Command>(),
            Err(CommandError::Unknown("buy".to_string()))
        );
        assert_eq!(
            "add".parse::<Command>(),
            Err(CommandError::MissingArgument("add"))
        );
    }

    #[test]
    fn script_fills_cart_and_reports_totals() -> TestResult {
        let (shell, output) = run_script("add Apples\nadd Apples\npromo\ncart\n")?;

        let cart = shell.store().cart();

        assert_eq!(cart.count("Apples"), 2);
        assert_eq!(cart.count("Kinder"), 2);
        assert!(output.contains("Apples added to cart!"));
        assert!(output.contains("Kinder added to cart!"));
        assert!(output.contains(&format!("Total: {}", shell.store().total()?)));

        Ok(())
    }

    #[test]
    fn errors_are_reported_and_shell_continues() -> TestResult {
        let (shell, output) = run_script("add Caviar\ndec Apples\nfly\nadd Bread\n")?;

        assert!(output.contains("Product not found: Caviar"));
        assert!(output.contains("Apples is not in the cart"));
        assert!(output.contains("Unknown command: fly"));
        assert_eq!(shell.store().cart().count("Bread"), 1);

        Ok(())
    }

    #[test]
    fn exit_stops_reading() -> TestResult {
        let (shell, output) = run_script("exit\nadd Apples\n")?;

        assert!(output.contains("Goodbye!"));
        assert!(shell.store().cart().is_empty());

        Ok(())
    }

    #[test]
    fn search_and_category_listing() -> TestResult {
        let (_, output) = run_script("search an\ncategory Bakery\nsearch zzz\n")?;

        assert!(output.contains("Bananas - 1 kg"));
        assert!(output.contains("Oranges - 1 kg"));
        assert!(output.contains("Croissant - 1 pc"));
        assert!(output.contains("Nothing matches \"zzz\"."));

        Ok(())
    }

    #[test]
    fn pay_hands_off_to_payment_url() -> TestResult {
        let (_, output) = run_script("add Milk\npay\n")?;

        assert!(output.contains("at https://example.com/payment"));

        Ok(())
    }

    #[test]
    fn help_shows_support_contact() -> TestResult {
        let (_, output) = run_script("help\n")?;

        assert!(output.contains("help@example.com"));
        assert!(output.contains("promo"));

        Ok(())
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generic "add item" form: one form whose fields depend on the item kind,
//! dispatched to one of five creation endpoints.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::error;

use crate::api::{ApiClient, RequestError};
use crate::models::{Account, Category, CategoryKind, ExpenseType, PaymentMethod, Periodicity};

pub const DEFAULT_COLOR: &str = "#3B82F6";
pub const FAILURE_NOTICE: &str = "Could not create item. Try again.";

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("unrecognized item type '{0}'")]
    UnrecognizedType(String),
    #[error("name is required")]
    MissingName,
    #[error("category kind is required (Receita or Despesa)")]
    MissingKind,
    #[error("invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Account,
    Category,
    PaymentMethod,
    ExpenseType,
    Periodicity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    LogoUrl,
    Color,
    Icon,
    Kind,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name *",
            Field::LogoUrl => "Logo URL",
            Field::Color => "Color",
            Field::Icon => "Icon",
            Field::Kind => "Kind *",
        }
    }
}

/// Field schema and endpoint of one item kind.
#[derive(Debug)]
pub struct ItemSpec {
    pub tag: &'static str,
    pub title: &'static str,
    pub path: &'static str,
    pub fields: &'static [Field],
    pub icons: &'static [&'static str],
}

static ACCOUNT: ItemSpec = ItemSpec {
    tag: "conta",
    title: "New bank account",
    path: "/contas",
    fields: &[Field::Name, Field::LogoUrl, Field::Color],
    icons: &[],
};

static CATEGORY: ItemSpec = ItemSpec {
    tag: "categoria",
    title: "New category",
    path: "/categorias",
    fields: &[Field::Name, Field::Icon, Field::Kind],
    icons: &["🍽️", "🏠", "🚗", "🎮", "👕", "💊"],
};

static PAYMENT_METHOD: ItemSpec = ItemSpec {
    tag: "forma-pagamento",
    title: "New payment method",
    path: "/formas-pagamento",
    fields: &[Field::Name, Field::Icon],
    icons: &["💳", "💰", "🏦", "📱", "💸"],
};

static EXPENSE_TYPE: ItemSpec = ItemSpec {
    tag: "tipo-gasto",
    title: "New expense type",
    path: "/tipos-gasto",
    fields: &[Field::Name],
    icons: &[],
};

static PERIODICITY: ItemSpec = ItemSpec {
    tag: "periodicidade",
    title: "New periodicity",
    path: "/periodicidades",
    fields: &[Field::Name],
    icons: &[],
};

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Account,
        ItemKind::Category,
        ItemKind::PaymentMethod,
        ItemKind::ExpenseType,
        ItemKind::Periodicity,
    ];

    pub fn spec(&self) -> &'static ItemSpec {
        match self {
            ItemKind::Account => &ACCOUNT,
            ItemKind::Category => &CATEGORY,
            ItemKind::PaymentMethod => &PAYMENT_METHOD,
            ItemKind::ExpenseType => &EXPENSE_TYPE,
            ItemKind::Periodicity => &PERIODICITY,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.spec().tag
    }
}

impl FromStr for ItemKind {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().replace('_', "-");
        ItemKind::ALL
            .into_iter()
            .find(|k| k.tag() == norm)
            .ok_or_else(|| ItemError::UnrecognizedType(s.to_string()))
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub nome: String,
    pub icone: String,
    pub tipo: Option<CategoryKind>,
    pub cor: String,
    pub imagem_url: String,
}

impl ItemForm {
    /// The one place the empty form is defined; used on open and on every reset.
    pub fn blank() -> Self {
        Self {
            nome: String::new(),
            icone: String::new(),
            tipo: None,
            cor: DEFAULT_COLOR.to_string(),
            imagem_url: String::new(),
        }
    }

    /// Builds the request body for `kind`, checking only what the form controls
    /// would enforce.
    pub fn payload(&self, kind: ItemKind) -> Result<ItemPayload, ItemError> {
        let nome = self.nome.trim().to_string();
        if nome.is_empty() {
            return Err(ItemError::MissingName);
        }
        let payload = match kind {
            ItemKind::Account => {
                let cor = self.cor.trim().to_string();
                if !HEX_COLOR.is_match(&cor) {
                    return Err(ItemError::InvalidColor(cor));
                }
                ItemPayload::Account(NewAccount {
                    nome,
                    cor,
                    logo_url: self.imagem_url.trim().to_string(),
                })
            }
            ItemKind::Category => ItemPayload::Category(NewCategory {
                nome,
                icone: self.icone.clone(),
                tipo: self.tipo.ok_or(ItemError::MissingKind)?,
            }),
            ItemKind::PaymentMethod => ItemPayload::PaymentMethod(NewPaymentMethod {
                nome,
                icone: self.icone.clone(),
            }),
            ItemKind::ExpenseType => ItemPayload::ExpenseType(NewNamed { nome }),
            ItemKind::Periodicity => ItemPayload::Periodicity(NewNamed { nome }),
        };
        Ok(payload)
    }
}

impl Default for ItemForm {
    fn default() -> Self {
        Self::blank()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub nome: String,
    pub cor: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub nome: String,
    pub icone: String,
    pub tipo: CategoryKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPaymentMethod {
    pub nome: String,
    pub icone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNamed {
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPayload {
    Account(NewAccount),
    Category(NewCategory),
    PaymentMethod(NewPaymentMethod),
    ExpenseType(NewNamed),
    Periodicity(NewNamed),
}

impl ItemPayload {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemPayload::Account(_) => ItemKind::Account,
            ItemPayload::Category(_) => ItemKind::Category,
            ItemPayload::PaymentMethod(_) => ItemKind::PaymentMethod,
            ItemPayload::ExpenseType(_) => ItemKind::ExpenseType,
            ItemPayload::Periodicity(_) => ItemKind::Periodicity,
        }
    }

    /// The JSON body exactly as it goes on the wire.
    pub fn body(&self) -> serde_json::Value {
        let v = match self {
            ItemPayload::Account(b) => serde_json::to_value(b),
            ItemPayload::Category(b) => serde_json::to_value(b),
            ItemPayload::PaymentMethod(b) => serde_json::to_value(b),
            ItemPayload::ExpenseType(b) | ItemPayload::Periodicity(b) => serde_json::to_value(b),
        };
        v.unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreatedItem {
    Account(Account),
    Category(Category),
    PaymentMethod(PaymentMethod),
    ExpenseType(ExpenseType),
    Periodicity(Periodicity),
}

impl CreatedItem {
    pub fn id(&self) -> i64 {
        match self {
            CreatedItem::Account(x) => x.id,
            CreatedItem::Category(x) => x.id,
            CreatedItem::PaymentMethod(x) => x.id,
            CreatedItem::ExpenseType(x) => x.id,
            CreatedItem::Periodicity(x) => x.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CreatedItem::Account(x) => &x.nome,
            CreatedItem::Category(x) => &x.nome,
            CreatedItem::PaymentMethod(x) => &x.nome,
            CreatedItem::ExpenseType(x) => &x.nome,
            CreatedItem::Periodicity(x) => &x.nome,
        }
    }
}

/// Where item payloads get created. [`ApiClient`] is the real one.
pub trait ItemBackend {
    fn create_item(&self, payload: &ItemPayload) -> Result<CreatedItem, RequestError>;
}

impl ItemBackend for ApiClient {
    fn create_item(&self, payload: &ItemPayload) -> Result<CreatedItem, RequestError> {
        Ok(match payload {
            ItemPayload::Account(b) => CreatedItem::Account(self.create_account(b)?),
            ItemPayload::Category(b) => CreatedItem::Category(self.create_category(b)?),
            ItemPayload::PaymentMethod(b) => {
                CreatedItem::PaymentMethod(self.create_payment_method(b)?)
            }
            ItemPayload::ExpenseType(b) => CreatedItem::ExpenseType(self.create_expense_type(b)?),
            ItemPayload::Periodicity(b) => CreatedItem::Periodicity(self.create_periodicity(b)?),
        })
    }
}

/// Form state plus the caller's callback. The tag stays a string until
/// submission so an unknown tag is reported there, before any request.
pub struct ItemDialog<F>
where
    F: FnMut(&CreatedItem),
{
    tag: String,
    pub form: ItemForm,
    on_added: F,
}

impl<F> ItemDialog<F>
where
    F: FnMut(&CreatedItem),
{
    pub fn new(tag: impl Into<String>, on_added: F) -> Self {
        Self {
            tag: tag.into(),
            form: ItemForm::blank(),
            on_added,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// On success the callback runs and the form is reset. On failure the
    /// form keeps what was typed so the user can retry.
    pub fn submit<B: ItemBackend>(&mut self, backend: &B) -> Result<CreatedItem, ItemError> {
        let result = self
            .tag
            .parse::<ItemKind>()
            .and_then(|kind| self.form.payload(kind))
            .and_then(|payload| Ok(backend.create_item(&payload)?));
        match &result {
            Ok(item) => {
                (self.on_added)(item);
                self.reset();
            }
            Err(e) => error!(tag = %self.tag, error = %e, "item creation failed"),
        }
        result
    }

    pub fn reset(&mut self) {
        self.form = ItemForm::blank();
    }
}

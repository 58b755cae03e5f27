//! In-memory ports for use case tests.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use painel_domain::metrics::SaleFact;
use painel_domain::money::Money;
use painel_domain::period::Window;
use painel_domain::user::UserRole;

use crate::domain::repository::{
    OAuthVerifier, PasswordHasher, ProductRepository, SaleRepository, SalesAnalyticsPort,
    UserRepository,
};
use crate::domain::types::{
    NewProduct, NewSale, NewUser, OAuthIdentity, OAuthProvider, Product, ProductPatch, SaleFilter,
    SalePatch, SaleView, User, UserPatch,
};
use crate::error::ApiError;

pub fn user(id: i32, email: &str, role: UserRole) -> User {
    User {
        id,
        name: email.split('@').next().unwrap_or_default().to_owned(),
        email: email.to_owned(),
        password_hash: "plain:secret".to_owned(),
        role,
        avatar: None,
        oauth_provider: None,
        oauth_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn product(id: i32, name: &str, category: &str, cents: i64, stock: i32) -> Product {
    Product {
        id,
        name: name.to_owned(),
        description: None,
        price: Money::from_cents(cents),
        category: category.to_owned(),
        stock,
        image: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryUsers {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUsers {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn get(&self, id: i32) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

impl UserRepository for MemoryUsers {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let mut users = self.users.lock().unwrap().clone();
        users.reverse();
        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_oauth(
        &self,
        provider: OAuthProvider,
        oauth_id: &str,
    ) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                u.oauth_provider.as_deref() == Some(provider.as_str())
                    && u.oauth_id.as_deref() == Some(oauth_id)
            })
            .cloned())
    }

    async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email == email && Some(u.id) != except))
    }

    async fn count_admins(&self) -> Result<u64, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role.is_admin())
            .count() as u64)
    }

    async fn create(&self, new: &NewUser) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Err(ApiError::EmailInUse);
        }
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let created = User {
            id,
            name: new.name.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            role: new.role,
            avatar: new.avatar.clone(),
            oauth_provider: new.oauth_provider.clone(),
            oauth_id: new.oauth_id.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, patch: &UserPatch) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        if let Some(ref name) = patch.name {
            user.name = name.clone();
        }
        if let Some(ref email) = patch.email {
            user.email = email.clone();
        }
        if let Some(ref hash) = patch.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(ref avatar) = patch.avatar {
            user.avatar = Some(avatar.clone());
        }
        Ok(user.clone())
    }

    async fn link_oauth(&self, id: i32, identity: &OAuthIdentity) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        user.oauth_provider = Some(identity.provider.as_str().to_owned());
        user.oauth_id = Some(identity.id.clone());
        if user.avatar.is_none() {
            user.avatar = identity.picture.clone();
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryProducts {
    pub products: Arc<Mutex<Vec<Product>>>,
    /// Sale count reported for every product.
    pub sales_per_product: u64,
}

impl MemoryProducts {
    pub fn with(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
            sales_per_product: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.products.lock().unwrap().len()
    }

    pub fn get(&self, id: i32) -> Option<Product> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

impl ProductRepository for MemoryProducts {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ApiError> {
        Ok(self.get(id))
    }

    async fn create(&self, new: &NewProduct) -> Result<Product, ApiError> {
        let mut products = self.products.lock().unwrap();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let created = Product {
            id,
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            category: new.category.clone(),
            stock: new.stock,
            image: new.image.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        products.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, patch: &ProductPatch) -> Result<Product, ApiError> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::ProductNotFound)?;
        if let Some(ref name) = patch.name {
            product.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(ref category) = patch.category {
            product.category = category.clone();
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(ref image) = patch.image {
            product.image = Some(image.clone());
        }
        Ok(product.clone())
    }

    async fn count_sales(&self, _id: i32) -> Result<u64, ApiError> {
        Ok(self.sales_per_product)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

// ── Sales ────────────────────────────────────────────────────────────────────

/// Sales backed by a [`MemoryProducts`] so stock moves with each recorded sale.
#[derive(Clone, Default)]
pub struct MemorySales {
    pub products: MemoryProducts,
    pub sales: Arc<Mutex<Vec<SaleView>>>,
}

impl MemorySales {
    pub fn new(products: MemoryProducts) -> Self {
        Self {
            products,
            sales: Arc::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.sales.lock().unwrap().len()
    }
}

impl SaleRepository for MemorySales {
    async fn list(&self, filter: &SaleFilter) -> Result<Vec<SaleView>, ApiError> {
        let sales = self.sales.lock().unwrap();
        let mut out: Vec<SaleView> = sales
            .iter()
            .rev()
            .filter(|s| filter.from.is_none_or(|from| s.created_at >= from))
            .filter(|s| filter.until.is_none_or(|until| until.admits(s.created_at)))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            out.truncate(limit as usize);
        }
        Ok(out)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<SaleView>, ApiError> {
        Ok(self
            .sales
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn create_with_stock_decrement(&self, sale: &NewSale) -> Result<SaleView, ApiError> {
        let product = {
            let mut products = self.products.products.lock().unwrap();
            let product = products
                .iter_mut()
                .find(|p| p.id == sale.product_id && p.stock > 0)
                .ok_or(ApiError::OutOfStock)?;
            product.stock -= 1;
            product.clone()
        };
        let mut sales = self.sales.lock().unwrap();
        let view = SaleView {
            id: sales.len() as i32 + 1,
            product_id: Some(sale.product_id),
            user_id: Some(sale.user_id),
            total: sale.total,
            status: sale.status,
            payment_method: sale.payment_method.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            product_name: Some(product.name),
            product_category: Some(product.category),
            user_name: None,
        };
        sales.push(view.clone());
        Ok(view)
    }

    async fn update(&self, id: i32, patch: &SalePatch) -> Result<SaleView, ApiError> {
        let mut sales = self.sales.lock().unwrap();
        let sale = sales
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ApiError::SaleNotFound)?;
        if let Some(status) = patch.status {
            sale.status = status;
        }
        if let Some(ref method) = patch.payment_method {
            sale.payment_method = Some(method.clone());
        }
        Ok(sale.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut sales = self.sales.lock().unwrap();
        let before = sales.len();
        sales.retain(|s| s.id != id);
        Ok(sales.len() != before)
    }
}

// ── Analytics ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryAnalytics {
    pub facts: Vec<SaleFact>,
}

impl SalesAnalyticsPort for MemoryAnalytics {
    async fn facts(&self, window: &Window) -> Result<Vec<SaleFact>, ApiError> {
        Ok(self
            .facts
            .iter()
            .filter(|f| window.contains(f.created_at))
            .cloned()
            .collect())
    }

    async fn recent(&self, window: &Window, limit: u64) -> Result<Vec<SaleView>, ApiError> {
        let mut facts = self.facts(window).await?;
        facts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(facts
            .into_iter()
            .take(limit as usize)
            .map(|f| SaleView {
                id: f.sale_id,
                product_id: f.product_id,
                user_id: f.user_id,
                total: f.total,
                status: Default::default(),
                payment_method: None,
                created_at: f.created_at,
                updated_at: f.created_at,
                product_name: f.product_name,
                product_category: f.category,
                user_name: None,
            })
            .collect())
    }
}

// ── Passwords / OAuth ────────────────────────────────────────────────────────

/// Reversible "hash" so tests can assert on stored values without argon2 cost.
#[derive(Clone, Copy)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, ApiError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }
}

/// Accepts exactly one access token and answers with a fixed identity.
#[derive(Clone)]
pub struct StubVerifier {
    pub token: String,
    pub identity: OAuthIdentity,
}

impl OAuthVerifier for StubVerifier {
    async fn verify(
        &self,
        provider: OAuthProvider,
        access_token: &str,
    ) -> Result<OAuthIdentity, ApiError> {
        if access_token == self.token && provider == self.identity.provider {
            Ok(self.identity.clone())
        } else {
            Err(ApiError::InvalidOAuthToken)
        }
    }
}

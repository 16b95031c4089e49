//! Pet service
//!
//! Mostly pass-through to storage. The two pieces of real logic are the
//! name/status patch selection in `update_pet_by_id` and the upload flow in
//! `add_image_url_for_pet_by_id`.

use std::sync::Arc;

use crate::domain::entities::{Pet, PetId, PetStatus};
use crate::domain::ports::{ImageStore, Storage};
use crate::error::DomainError;

/// Service for managing pets
pub struct PetService<S, IS>
where
    S: Storage,
    IS: ImageStore,
{
    storage: Arc<S>,
    images: Arc<IS>,
    public_base_uri: String,
}

impl<S, IS> PetService<S, IS>
where
    S: Storage,
    IS: ImageStore,
{
    pub fn new(storage: Arc<S>, images: Arc<IS>, public_base_uri: impl Into<String>) -> Self {
        Self {
            storage,
            images,
            public_base_uri: public_base_uri.into(),
        }
    }

    pub async fn add_pet(&self, pet: &Pet) -> Result<(), DomainError> {
        self.storage.create_pet(pet).await
    }

    /// Replace the whole stored pet with `pet`
    pub async fn update_pet(&self, pet: &Pet) -> Result<(), DomainError> {
        self.storage.update_pet_by_id(pet).await
    }

    pub async fn find_pets_by_status(
        &self,
        statuses: &[PetStatus],
    ) -> Result<Vec<Pet>, DomainError> {
        self.storage.find_pets_by_status(statuses).await
    }

    pub async fn find_pet_by_id(&self, id: PetId) -> Result<Pet, DomainError> {
        self.storage.retrieve_pet_by_id(id).await
    }

    /// Patch only the fields that were supplied
    ///
    /// An empty `name` or `status` means "leave unchanged". Supplying neither
    /// is an error rather than a no-op.
    pub async fn update_pet_by_id(
        &self,
        id: PetId,
        name: &str,
        status: &str,
    ) -> Result<(), DomainError> {
        match (name.is_empty(), status.is_empty()) {
            (true, true) => Err(DomainError::InvalidArgument(
                "both name and status are empty".to_string(),
            )),
            (false, true) => self.storage.update_pet_name_by_id(id, name).await,
            (true, false) => {
                let status = parse_status(status)?;
                self.storage.update_pet_status_by_id(id, status).await
            }
            (false, false) => {
                let status = parse_status(status)?;
                self.storage
                    .update_pet_name_and_status_by_id(id, name, status)
                    .await
            }
        }
    }

    /// Store an uploaded image and record its public URL on the pet.
    /// Returns the URL.
    ///
    /// The file is written before the pet is touched, so an unknown pet
    /// leaves the file behind.
    pub async fn add_image_url_for_pet_by_id(
        &self,
        id: PetId,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let filename = self.images.save(original_name, bytes).await?;
        let url = format!("{}/{}", self.public_base_uri, filename);

        let pet = self.storage.add_image_url_by_pet_id(id, &url).await?;
        tracing::info!(pet_id = %id, %url, photos = pet.photo_urls.len(), "Image uploaded");
        Ok(url)
    }

    pub async fn delete_pet_by_id(&self, id: PetId) -> Result<(), DomainError> {
        self.storage.delete_pet_by_id(id).await
    }
}

fn parse_status(raw: &str) -> Result<PetStatus, DomainError> {
    raw.parse().map_err(DomainError::InvalidArgument)
}

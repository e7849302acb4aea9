use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::redis::RedisClient;
use adapter::repository::{
    auth::AuthRepositoryImpl, availability::AvailabilityRepositoryImpl,
    booking::BookingRepositoryImpl, health::HealthCheckRepositoryImpl, office::OfficeRepositoryImpl,
    user::UserRepositoryImpl,
};
use kernel::repository::{
    auth::AuthRepository, availability::AvailabilityRepository, booking::BookingRepository,
    health::HealthCheckRepository, office::OfficeRepository, user::UserRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    office_repository: Arc<dyn OfficeRepository>,
    availability_repository: Arc<dyn AvailabilityRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, redis_client: Arc<RedisClient>, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let office_repository = Arc::new(OfficeRepositoryImpl::new(pool.clone()));
        let availability_repository = Arc::new(AvailabilityRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        Self {
            health_check_repository,
            office_repository,
            availability_repository,
            booking_repository,
            user_repository,
            auth_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn office_repository(&self) -> Arc<dyn OfficeRepository> {
        self.office_repository.clone()
    }

    pub fn availability_repository(&self) -> Arc<dyn AvailabilityRepository> {
        self.availability_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }
}

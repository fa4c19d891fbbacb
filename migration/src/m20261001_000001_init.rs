use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== USERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).text().not_null())
                    .col(ColumnDef::new(Users::Email).text().not_null())
                    .col(ColumnDef::new(Users::Plan).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        // ========== SENSORS ==========
        manager
            .create_table(
                Table::create()
                    .table(Sensors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sensors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sensors::Name).text().not_null())
                    .col(ColumnDef::new(Sensors::Type).string_len(16).not_null())
                    .col(ColumnDef::new(Sensors::Location).text().not_null())
                    .col(ColumnDef::new(Sensors::Unit).text())
                    .col(ColumnDef::new(Sensors::Latitude).double())
                    .col(ColumnDef::new(Sensors::Longitude).double())
                    .col(
                        ColumnDef::new(Sensors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("sensors_type_idx")
                    .table(Sensors::Table)
                    .col(Sensors::Type)
                    .to_owned(),
            )
            .await?;

        // ========== SENSOR READINGS ==========
        manager
            .create_table(
                Table::create()
                    .table(SensorReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorReadings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SensorReadings::SensorId).uuid().not_null())
                    .col(ColumnDef::new(SensorReadings::SensorName).text().not_null())
                    .col(ColumnDef::new(SensorReadings::Location).text().not_null())
                    .col(
                        ColumnDef::new(SensorReadings::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SensorReadings::Type).string_len(16).not_null())
                    .col(ColumnDef::new(SensorReadings::Value).double().not_null())
                    .col(ColumnDef::new(SensorReadings::Unit).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Windowed queries are always per sensor, ordered by time
        manager
            .create_index(
                Index::create()
                    .name("sensor_readings_sensor_time_idx")
                    .table(SensorReadings::Table)
                    .col(SensorReadings::SensorId)
                    .col(SensorReadings::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== REPORTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reports::UserId).uuid().not_null())
                    .col(ColumnDef::new(Reports::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Reports::Location).text().not_null())
                    .col(ColumnDef::new(Reports::Value).double().not_null())
                    .col(ColumnDef::new(Reports::Unit).text().not_null())
                    .col(
                        ColumnDef::new(Reports::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reports::Comment).text())
                    .to_owned(),
            )
            .await?;

        // ========== USER REPORTS ==========
        manager
            .create_table(
                Table::create()
                    .table(UserReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserReports::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserReports::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserReports::SensorId).uuid().not_null())
                    .col(ColumnDef::new(UserReports::SensorName).text().not_null())
                    .col(ColumnDef::new(UserReports::Location).text().not_null())
                    .col(
                        ColumnDef::new(UserReports::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserReports::Type).string_len(16).not_null())
                    .col(ColumnDef::new(UserReports::Value).double().not_null())
                    .col(ColumnDef::new(UserReports::Unit).text().not_null())
                    .col(ColumnDef::new(UserReports::Source).text())
                    .col(ColumnDef::new(UserReports::Comment).text())
                    .col(
                        ColumnDef::new(UserReports::Likes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserReports::LikedBy).json().not_null())
                    .to_owned(),
            )
            .await?;

        // Cascade on user delete filters by owner
        manager
            .create_index(
                Index::create()
                    .name("user_reports_user_idx")
                    .table(UserReports::Table)
                    .col(UserReports::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("user_reports_timestamp_idx")
                    .table(UserReports::Table)
                    .col(UserReports::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SensorReadings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sensors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Plan,
}

#[derive(DeriveIden)]
enum Sensors {
    Table,
    Id,
    Name,
    Type,
    Location,
    Unit,
    Latitude,
    Longitude,
    IsActive,
}

#[derive(DeriveIden)]
enum SensorReadings {
    Table,
    Id,
    SensorId,
    SensorName,
    Location,
    Timestamp,
    Type,
    Value,
    Unit,
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    UserId,
    Category,
    Location,
    Value,
    Unit,
    Timestamp,
    Comment,
}

#[derive(DeriveIden)]
enum UserReports {
    Table,
    Id,
    UserId,
    SensorId,
    SensorName,
    Location,
    Timestamp,
    Type,
    Value,
    Unit,
    Source,
    Comment,
    Likes,
    LikedBy,
}

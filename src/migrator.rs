use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_directory_tables::Migration),
            Box::new(m20251001_000002_create_sheet_tables::Migration),
            Box::new(m20251001_000003_create_workflow_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20251001_000001_create_directory_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251001_000001_create_directory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Plants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Plants::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Plants::Name).string().not_null())
                        .col(ColumnDef::new(Plants::Location).string().not_null())
                        .col(ColumnDef::new(Plants::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PlantAssignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PlantAssignments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PlantAssignments::ManagerId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlantAssignments::PlantId)
                                .big_integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_plant_assignments_manager_id")
                        .table(PlantAssignments::Table)
                        .col(PlantAssignments::ManagerId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PlantAssignments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Plants::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Plants {
        Table,
        Id,
        Name,
        Location,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Name,
        Email,
        Role,
        Active,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum PlantAssignments {
        Table,
        Id,
        ManagerId,
        PlantId,
    }
}

mod m20251001_000002_create_sheet_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251001_000002_create_sheet_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MonthlySheets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MonthlySheets::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(MonthlySheets::PlantId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MonthlySheets::Year).integer().not_null())
                        .col(ColumnDef::new(MonthlySheets::Month).integer().not_null())
                        .col(
                            ColumnDef::new(MonthlySheets::Locked)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(MonthlySheets::LockedAt).timestamp().null())
                        .col(
                            ColumnDef::new(MonthlySheets::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // At most one sheet per (plant, year, month)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_monthly_sheets_plant_period")
                        .table(MonthlySheets::Table)
                        .col(MonthlySheets::PlantId)
                        .col(MonthlySheets::Year)
                        .col(MonthlySheets::Month)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Transactions::SheetId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::Date).date().not_null())
                        .col(ColumnDef::new(Transactions::TxType).string().not_null())
                        .col(ColumnDef::new(Transactions::Item).string().not_null())
                        .col(
                            ColumnDef::new(Transactions::Quantity)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Transactions::Value)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Transactions::CreatedBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::Notes).string().null())
                        .col(
                            ColumnDef::new(Transactions::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_sheet_id")
                        .table(Transactions::Table)
                        .col(Transactions::SheetId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_date")
                        .table(Transactions::Table)
                        .col(Transactions::Date)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Transactions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MonthlySheets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum MonthlySheets {
        Table,
        Id,
        PlantId,
        Year,
        Month,
        Locked,
        LockedAt,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Transactions {
        Table,
        Id,
        SheetId,
        Date,
        TxType,
        Item,
        Quantity,
        Value,
        CreatedBy,
        Notes,
        CreatedAt,
    }
}

mod m20251001_000003_create_workflow_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251001_000003_create_workflow_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Requests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Requests::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Requests::RequesterId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Requests::PlantId).big_integer().not_null())
                        .col(ColumnDef::new(Requests::SheetId).big_integer().not_null())
                        .col(ColumnDef::new(Requests::RequestType).string().not_null())
                        .col(ColumnDef::new(Requests::Details).string().not_null())
                        .col(
                            ColumnDef::new(Requests::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(Requests::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Requests::ResolvedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_requests_status")
                        .table(Requests::Table)
                        .col(Requests::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ActivityLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ActivityLogs::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ActivityLogs::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ActivityLogs::Action).string().not_null())
                        .col(ColumnDef::new(ActivityLogs::Payload).json().not_null())
                        .col(
                            ColumnDef::new(ActivityLogs::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_activity_logs_created_at")
                        .table(ActivityLogs::Table)
                        .col(ActivityLogs::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Requests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Requests {
        Table,
        Id,
        RequesterId,
        PlantId,
        SheetId,
        RequestType,
        Details,
        Status,
        CreatedAt,
        ResolvedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum ActivityLogs {
        Table,
        Id,
        UserId,
        Action,
        Payload,
        CreatedAt,
    }
}
